//! Shared doubles for integration tests.
//!
//! `InMemoryChain` and `InMemoryRegistry` stand in for the node REST API and
//! the EVM registry contract so the router can be driven end to end.

#![allow(dead_code)]

use alloy::primitives::{Address, TxHash, B256};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use entry_relay::credential::Credential;
use entry_relay::evm::{EntityRelay, EvmEntity, EvmError, EvmResult, Wallet};
use entry_relay::move_chain::{
    AccountAddress, ChainError, ChainResult, Entry, EntryFunction, EntryService, LocalAccount,
    ModuleId, MoveChain,
};
use entry_relay::{build_router, AppState, RelayConfig};

/// Anvil's first account; also a valid ed25519 seed.
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Move chain holding per-account entry lists.
#[derive(Default)]
pub struct InMemoryChain {
    lists: Mutex<HashMap<AccountAddress, Vec<Entry>>>,
    submitted: Mutex<Vec<String>>,
    /// Added to every resource query.
    latency: Option<Duration>,
}

impl InMemoryChain {
    /// A chain whose resource queries stall for `latency`.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Functions submitted so far, in order.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn create_list_for(&self, address: AccountAddress) {
        self.lists.lock().unwrap().insert(address, Vec::new());
    }
}

#[async_trait]
impl MoveChain for InMemoryChain {
    async fn account_resource(
        &self,
        address: AccountAddress,
        _resource_type: &str,
    ) -> ChainResult<Option<Value>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self
            .lists
            .lock()
            .unwrap()
            .get(&address)
            .map(|entries| json!({ "entry_counter": entries.len().to_string() })))
    }

    async fn submit_and_wait(&self, account: &LocalAccount, call: EntryFunction) -> ChainResult<String> {
        let mut submitted = self.submitted.lock().unwrap();
        let mut lists = self.lists.lock().unwrap();
        match call.function.as_str() {
            "create_list" => {
                lists.insert(account.address(), Vec::new());
            }
            "create_entry" => {
                let list = lists.get_mut(&account.address()).ok_or_else(|| ChainError::Aborted {
                    hash: "0x00".into(),
                    vm_status: "Move abort: E_NO_LIST".into(),
                })?;
                list.push(Entry {
                    id: Some(list.len() as u64 + 1),
                    content: bcs::from_bytes(&call.args[0])?,
                    timestamp: bcs::from_bytes(&call.args[1])?,
                    address: account.address().to_string(),
                });
            }
            other => return Err(ChainError::Decode(format!("unknown function {}", other))),
        }
        submitted.push(call.function.clone());
        Ok(format!("0x{:02x}", submitted.len()))
    }

    async fn view(&self, _function: &str, arguments: Vec<Value>) -> ChainResult<Vec<Value>> {
        let address = AccountAddress::from_hex(arguments[0].as_str().unwrap_or_default())?;
        let id: u64 = arguments[1]
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ChainError::Decode("bad id".into()))?;
        let lists = self.lists.lock().unwrap();
        let entry = lists
            .get(&address)
            .and_then(|entries| entries.get((id - 1) as usize))
            .ok_or_else(|| ChainError::NotFound(format!("entry {}", id)))?;
        Ok(vec![json!({
            "content": entry.content,
            "timestamp": entry.timestamp.to_string(),
            "address": entry.address,
        })])
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

/// Entity registry keeping entities in insertion order.
#[derive(Default)]
pub struct InMemoryRegistry {
    entities: Mutex<Vec<EvmEntity>>,
}

#[async_trait]
impl EntityRelay for InMemoryRegistry {
    async fn add_entity(&self, credential: &Credential, data_uri: &str) -> EvmResult<TxHash> {
        let user = Wallet::from_credential(credential, 31337)?.address();
        let mut entities = self.entities.lock().unwrap();
        let id = entities.len() as u64 + 1;
        entities.push(EvmEntity {
            id,
            user,
            data_uri: data_uri.to_string(),
            timestamp: 1_700_000_000 + id,
        });
        Ok(B256::with_last_byte(id as u8))
    }

    async fn entities_of(&self, user: Address) -> EvmResult<Vec<EvmEntity>> {
        if user == Address::ZERO {
            return Err(EvmError::Contract("execution reverted".into()));
        }
        Ok(self
            .entities
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user == user)
            .cloned()
            .collect())
    }

    async fn is_healthy(&self) -> bool {
        false
    }
}

/// Router over both doubles, plus handles to inspect them.
pub struct TestRelay {
    pub router: axum::Router,
    pub chain: Arc<InMemoryChain>,
}

pub fn relay() -> TestRelay {
    relay_with(RelayConfig::default(), InMemoryChain::default())
}

pub fn relay_with(config: RelayConfig, chain: InMemoryChain) -> TestRelay {
    let chain = Arc::new(chain);
    let module = ModuleId {
        address: AccountAddress::from_hex("0xcafe").unwrap(),
        name: "vortexengine".to_string(),
    };
    let state = AppState {
        entries: Some(Arc::new(EntryService::new(chain.clone(), module))),
        entities: Some(Arc::new(InMemoryRegistry::default())),
    };
    TestRelay {
        router: build_router(&config, state),
        chain,
    }
}

/// Router with both chain paths disabled.
pub fn disabled_relay() -> axum::Router {
    build_router(&RelayConfig::default(), AppState::default())
}

pub fn test_address() -> AccountAddress {
    LocalAccount::from_credential(&Credential::from_hex(TEST_KEY).unwrap()).address()
}

pub async fn post_json(router: &axum::Router, path: &str, body: Value) -> Response<Body> {
    let request = Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

pub async fn get(router: &axum::Router, path: &str) -> Response<Body> {
    let request = Request::get(path).body(Body::empty()).unwrap();
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
