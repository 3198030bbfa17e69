//! Move chain node client over the REST API.
//!
//! # Responsibilities
//! - Query account resources and sequence numbers
//! - Build, sign, and submit entry-function transactions as BCS
//! - Poll until a submitted transaction commits (finality wait)
//! - Run read-only view functions
//!
//! Every call carries the configured timeout. Nothing is retried; a failed
//! call surfaces to the caller.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell;
use tokio::time::{interval, timeout};

use crate::config::MoveChainConfig;
use crate::move_chain::account::LocalAccount;
use crate::move_chain::transaction::{EntryFunction, RawTransaction, TransactionPayload};
use crate::move_chain::types::{de, AccountAddress, ChainError, ChainResult};

const SIGNED_TRANSACTION_BCS: &str = "application/x.aptos.signed_transaction+bcs";

/// Operations the relay needs from a Move chain.
#[async_trait]
pub trait MoveChain: Send + Sync {
    /// Resource `data` under `address`; `None` when the node answers 404.
    async fn account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> ChainResult<Option<Value>>;

    /// Build, sign, submit, and wait for `call`. Returns the committed hash.
    async fn submit_and_wait(&self, account: &LocalAccount, call: EntryFunction)
        -> ChainResult<String>;

    /// Execute a view function and return its result values.
    async fn view(&self, function: &str, arguments: Vec<Value>) -> ChainResult<Vec<Value>>;

    /// True when the node answers a ledger-info request.
    async fn is_healthy(&self) -> bool;
}

#[derive(Debug, Deserialize)]
struct LedgerInfo {
    chain_id: u8,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    #[serde(deserialize_with = "de::u64_from_str_or_num")]
    sequence_number: u64,
}

#[derive(Debug, Deserialize)]
struct Resource {
    data: Value,
}

#[derive(Debug, Deserialize)]
struct PendingTransaction {
    hash: String,
}

#[derive(Debug, Deserialize)]
struct TransactionStatus {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
}

/// REST client for a Move chain full node.
#[derive(Debug)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    config: MoveChainConfig,
    chain_id: OnceCell<u8>,
}

impl RestClient {
    /// Create a client for `config.node_url`. No network call is made.
    pub fn new(config: MoveChainConfig) -> ChainResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()?;
        let base_url = config.node_url.trim_end_matches('/').to_string();

        tracing::info!(
            node_url = %base_url,
            module = %format!("{}::{}", config.module_address, config.module_name),
            "Move chain client initialized"
        );

        Ok(Self {
            http,
            base_url,
            config,
            chain_id: OnceCell::new(),
        })
    }

    /// Chain id reported by the node, fetched once.
    pub async fn chain_id(&self) -> ChainResult<u8> {
        self.chain_id
            .get_or_try_init(|| async {
                let info: LedgerInfo = self.get_json("").await?;
                Ok::<_, ChainError>(info.chain_id)
            })
            .await
            .copied()
    }

    /// Current sequence number; accounts unknown to the node start at 0.
    pub async fn sequence_number(&self, address: AccountAddress) -> ChainResult<u64> {
        match self.get_json::<AccountInfo>(&format!("/accounts/{}", address)).await {
            Ok(info) => Ok(info.sequence_number),
            Err(ChainError::NotFound(_)) => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Submit a signed transaction; returns its hash without waiting.
    pub async fn submit(&self, account: &LocalAccount, call: EntryFunction) -> ChainResult<String> {
        let sender = account.address();
        let sequence_number = self.sequence_number(sender).await?;
        let chain_id = self.chain_id().await?;
        let function = call.function_id();

        let raw = RawTransaction {
            sender,
            sequence_number,
            payload: TransactionPayload(call),
            max_gas_amount: self.config.max_gas_amount,
            gas_unit_price: self.config.gas_unit_price,
            expiration_timestamp_secs: unix_now() + self.config.expiration_secs,
            chain_id,
        };
        let body = raw.sign(account)?.to_bcs()?;

        let response = self
            .http
            .post(self.url("/transactions"))
            .header(CONTENT_TYPE, SIGNED_TRANSACTION_BCS)
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;
        let pending: PendingTransaction = self.decode(response, "/transactions").await?;

        tracing::info!(
            sender = %sender,
            sequence_number,
            function = %function,
            tx_hash = %pending.hash,
            "Transaction submitted"
        );
        Ok(pending.hash)
    }

    /// Poll until `hash` commits. A committed but failed transaction is an
    /// error carrying the VM status.
    pub async fn wait_for_transaction(&self, hash: &str) -> ChainResult<()> {
        let wait_secs = self.config.wait_timeout_secs;
        let path = format!("/transactions/by_hash/{}", hash);

        let result = timeout(Duration::from_secs(wait_secs), async {
            let mut ticker = interval(Duration::from_millis(self.config.poll_interval_ms));

            loop {
                ticker.tick().await;

                let status: TransactionStatus = match self.get_json(&path).await {
                    Ok(status) => status,
                    Err(ChainError::NotFound(_)) => {
                        tracing::debug!(tx_hash = %hash, "Transaction not yet visible");
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                if status.kind == "pending_transaction" {
                    tracing::debug!(tx_hash = %hash, "Transaction pending");
                    continue;
                }

                return match status.success {
                    Some(true) => Ok(()),
                    _ => Err(ChainError::Aborted {
                        hash: hash.to_string(),
                        vm_status: status
                            .vm_status
                            .unwrap_or_else(|| "unknown vm status".to_string()),
                    }),
                };
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(ChainError::WaitTimeout {
                hash: hash.to_string(),
                secs: wait_secs,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ChainResult<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;
        self.decode(response, path).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        path: &str,
    ) -> ChainResult<T> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ChainError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChainError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ChainError::Decode(format!("{}: {}", path, e)))
    }

    fn map_transport(&self, e: reqwest::Error) -> ChainError {
        if e.is_timeout() {
            ChainError::Timeout(self.config.rpc_timeout_secs)
        } else {
            ChainError::Http(e)
        }
    }
}

#[async_trait]
impl MoveChain for RestClient {
    async fn account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> ChainResult<Option<Value>> {
        let path = format!("/accounts/{}/resource/{}", address, resource_type);
        match self.get_json::<Resource>(&path).await {
            Ok(resource) => Ok(Some(resource.data)),
            Err(ChainError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn submit_and_wait(
        &self,
        account: &LocalAccount,
        call: EntryFunction,
    ) -> ChainResult<String> {
        let hash = self.submit(account, call).await?;
        self.wait_for_transaction(&hash).await?;
        tracing::info!(tx_hash = %hash, "Transaction committed");
        Ok(hash)
    }

    async fn view(&self, function: &str, arguments: Vec<Value>) -> ChainResult<Vec<Value>> {
        let body = json!({
            "function": function,
            "type_arguments": [],
            "arguments": arguments,
        });
        let response = self
            .http
            .post(self.url("/view"))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;
        self.decode(response, "/view").await
    }

    async fn is_healthy(&self) -> bool {
        self.get_json::<Value>("").await.is_ok()
    }
}

/// Pull `message` out of a node error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use crate::move_chain::transaction::ModuleId;
    use axum::{
        body::Bytes,
        extract::{Path, State},
        http::{HeaderMap, StatusCode as AxumStatus},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Node {
        polls: Arc<AtomicUsize>,
        submitted: Arc<AtomicUsize>,
        abort: bool,
    }

    async fn ledger() -> Json<Value> {
        Json(json!({ "chain_id": 2, "ledger_version": "1" }))
    }

    async fn account(Path(addr): Path<String>) -> impl IntoResponse {
        if addr.ends_with('1') {
            (AxumStatus::OK, Json(json!({ "sequence_number": "4" }))).into_response()
        } else {
            (
                AxumStatus::NOT_FOUND,
                Json(json!({ "message": "Account not found", "error_code": "account_not_found" })),
            )
                .into_response()
        }
    }

    async fn resource(Path((addr, ty)): Path<(String, String)>) -> impl IntoResponse {
        if addr.ends_with('1') && ty.ends_with("::EntityList") {
            (AxumStatus::OK, Json(json!({ "type": ty, "data": { "entry_counter": "3" } })))
                .into_response()
        } else if addr.ends_with('f') {
            (AxumStatus::INTERNAL_SERVER_ERROR, Json(json!({ "message": "storage offline" })))
                .into_response()
        } else {
            (AxumStatus::NOT_FOUND, Json(json!({ "message": "Resource not found" }))).into_response()
        }
    }

    async fn submit(State(node): State<Node>, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
        if headers.get("content-type").and_then(|v| v.to_str().ok()) != Some(SIGNED_TRANSACTION_BCS)
            || body.is_empty()
        {
            return (AxumStatus::BAD_REQUEST, Json(json!({ "message": "bad envelope" })))
                .into_response();
        }
        node.submitted.fetch_add(1, Ordering::SeqCst);
        (AxumStatus::ACCEPTED, Json(json!({ "hash": "0xfeed", "type": "pending_transaction" })))
            .into_response()
    }

    async fn by_hash(State(node): State<Node>, Path(hash): Path<String>) -> impl IntoResponse {
        match node.polls.fetch_add(1, Ordering::SeqCst) {
            0 => (AxumStatus::NOT_FOUND, Json(json!({ "message": "not found" }))).into_response(),
            1 => Json(json!({ "type": "pending_transaction", "hash": hash })).into_response(),
            _ if node.abort => Json(json!({
                "type": "user_transaction",
                "hash": hash,
                "success": false,
                "vm_status": "Move abort in 0xcafe::vortexengine: E_LIST_EXISTS(0x1)"
            }))
            .into_response(),
            _ => Json(json!({
                "type": "user_transaction",
                "hash": hash,
                "success": true,
                "vm_status": "Executed successfully"
            }))
            .into_response(),
        }
    }

    async fn view(Json(body): Json<Value>) -> Json<Value> {
        Json(json!([{ "echo": body["function"], "args": body["arguments"] }]))
    }

    async fn start_node(node: Node) -> String {
        let app = Router::new()
            .route("/v1", get(ledger))
            .route("/v1/accounts/{addr}", get(account))
            .route("/v1/accounts/{addr}/resource/{ty}", get(resource))
            .route("/v1/transactions", post(submit))
            .route("/v1/transactions/by_hash/{hash}", get(by_hash))
            .route("/v1/view", post(view))
            .with_state(node);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}/v1", addr)
    }

    fn config(node_url: String) -> MoveChainConfig {
        MoveChainConfig {
            node_url,
            module_address: "0xcafe".to_string(),
            rpc_timeout_secs: 5,
            wait_timeout_secs: 5,
            poll_interval_ms: 10,
            ..MoveChainConfig::default()
        }
    }

    fn signer() -> LocalAccount {
        LocalAccount::from_credential(&Credential::from_hex(&"42".repeat(32)).unwrap())
    }

    fn create_list() -> EntryFunction {
        EntryFunction::new(
            ModuleId {
                address: AccountAddress::from_hex("0xcafe").unwrap(),
                name: "vortexengine".to_string(),
            },
            "create_list",
        )
    }

    #[tokio::test]
    async fn test_resource_lookup() {
        let client = RestClient::new(config(start_node(Node::default()).await)).unwrap();

        let found = client
            .account_resource(AccountAddress::from_hex("0x1").unwrap(), "0xcafe::vortexengine::EntityList")
            .await
            .unwrap();
        assert_eq!(found.unwrap()["entry_counter"], "3");

        let missing = client
            .account_resource(AccountAddress::from_hex("0x2").unwrap(), "0xcafe::vortexengine::EntityList")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_resource_server_error_propagates() {
        let client = RestClient::new(config(start_node(Node::default()).await)).unwrap();
        let err = client
            .account_resource(AccountAddress::from_hex("0xf").unwrap(), "0xcafe::vortexengine::EntityList")
            .await
            .unwrap_err();
        match err {
            ChainError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "storage offline");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_sequence_number_defaults_to_zero() {
        let client = RestClient::new(config(start_node(Node::default()).await)).unwrap();
        assert_eq!(client.sequence_number(AccountAddress::from_hex("0x1").unwrap()).await.unwrap(), 4);
        assert_eq!(client.sequence_number(AccountAddress::from_hex("0x2").unwrap()).await.unwrap(), 0);
        assert_eq!(client.chain_id().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_submit_and_wait() {
        let node = Node::default();
        let client = RestClient::new(config(start_node(node.clone()).await)).unwrap();

        let hash = client.submit_and_wait(&signer(), create_list()).await.unwrap();
        assert_eq!(hash, "0xfeed");
        assert_eq!(node.submitted.load(Ordering::SeqCst), 1);
        assert!(node.polls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_aborted_transaction_reports_vm_status() {
        let node = Node {
            abort: true,
            ..Node::default()
        };
        let client = RestClient::new(config(start_node(node).await)).unwrap();

        let err = client.submit_and_wait(&signer(), create_list()).await.unwrap_err();
        assert!(matches!(err, ChainError::Aborted { .. }));
        assert!(err.to_string().contains("E_LIST_EXISTS"));
    }

    #[tokio::test]
    async fn test_view_call() {
        let client = RestClient::new(config(start_node(Node::default()).await)).unwrap();
        let values = client
            .view("0xcafe::vortexengine::get_entry", vec![json!("0x1"), json!("2")])
            .await
            .unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["echo"], "0xcafe::vortexengine::get_entry");
        assert_eq!(values[0]["args"][1], "2");
    }

    #[tokio::test]
    async fn test_unreachable_node() {
        let client = RestClient::new(config("http://127.0.0.1:1/v1".to_string())).unwrap();
        assert!(!client.is_healthy().await);
        assert!(client.chain_id().await.is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message":"bad sequence number"}"#), "bad sequence number");
        assert_eq!(error_message("plain text"), "plain text");
    }
}
