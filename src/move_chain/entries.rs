//! Entity-list operations on the Move chain.
//!
//! # Data Flow
//! ```text
//! create-list:   resource query → [create_list tx → wait]
//! create-entry:  ensure list → create_entry(content, timestamp) tx → wait
//! list entries:  resource query (entry_counter) → get_entry view × counter
//! ```
//!
//! Every chain call is awaited in sequence, including the per-entry views.

use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::{RelayError, RelayResult};
use crate::move_chain::account::LocalAccount;
use crate::move_chain::client::MoveChain;
use crate::move_chain::transaction::{EntryFunction, ModuleId};
use crate::move_chain::types::{de, AccountAddress, ChainError, Entry, ListStatus};
use crate::observability::metrics;

const LIST_RESOURCE: &str = "EntityList";
const CREATE_LIST: &str = "create_list";
const CREATE_ENTRY: &str = "create_entry";
const GET_ENTRY: &str = "get_entry";
const ENTRY_COUNTER: &str = "entry_counter";

/// Upper bound on `entry_counter`; each entry costs one sequential view call.
pub const MAX_LISTED_ENTRIES: u64 = 10_000;

/// Entry operations for one published module.
#[derive(Clone)]
pub struct EntryService {
    chain: Arc<dyn MoveChain>,
    module: ModuleId,
}

impl EntryService {
    pub fn new(chain: Arc<dyn MoveChain>, module: ModuleId) -> Self {
        Self { chain, module }
    }

    /// Fully-qualified type of the per-account list resource.
    pub fn list_resource_type(&self) -> String {
        format!("{}::{}", self.module, LIST_RESOURCE)
    }

    pub fn chain(&self) -> &Arc<dyn MoveChain> {
        &self.chain
    }

    /// Whether `address` already holds an entity list. A 404 from the node
    /// means `false`; any other failure propagates.
    pub async fn list_exists(&self, address: AccountAddress) -> RelayResult<bool> {
        let resource = self
            .chain
            .account_resource(address, &self.list_resource_type())
            .await
            .map_err(|e| RelayError::Query(e.to_string()))?;
        Ok(resource.is_some())
    }

    /// Create the list for `account`, failing with `DuplicateResource` when
    /// one is already on chain.
    pub async fn create_list(&self, account: &LocalAccount) -> RelayResult<String> {
        if self.list_exists(account.address()).await? {
            return Err(RelayError::DuplicateResource(
                "List already exists for this wallet.".to_string(),
            ));
        }
        self.submit(account, EntryFunction::new(self.module.clone(), CREATE_LIST))
            .await
    }

    /// Make sure `account` holds a list, creating it when absent.
    ///
    /// If creation fails but the list exists afterwards, a concurrent
    /// request won the race and the outcome is `Existing`.
    pub async fn ensure_list_exists(&self, account: &LocalAccount) -> RelayResult<ListStatus> {
        let address = account.address();
        if self.list_exists(address).await? {
            tracing::debug!(account = %address, "Entity list already present");
            return Ok(ListStatus::Existing);
        }

        tracing::info!(account = %address, "Creating entity list");
        match self
            .submit(account, EntryFunction::new(self.module.clone(), CREATE_LIST))
            .await
        {
            Ok(hash) => Ok(ListStatus::Created(hash)),
            Err(err) => {
                if matches!(self.list_exists(address).await, Ok(true)) {
                    tracing::warn!(
                        account = %address,
                        error = %err,
                        "List creation lost a race; list now exists"
                    );
                    Ok(ListStatus::Existing)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Ensure the list, then append one entry. Returns the list status and
    /// the entry transaction hash.
    pub async fn create_entry(
        &self,
        account: &LocalAccount,
        content: &str,
        timestamp: u64,
    ) -> RelayResult<(ListStatus, String)> {
        let list = self.ensure_list_exists(account).await?;

        let call = EntryFunction::new(self.module.clone(), CREATE_ENTRY)
            .arg(content)
            .and_then(|call| call.arg(&timestamp))
            .map_err(|e| RelayError::TransactionFailed(e.to_string()))?;
        let hash = self.submit(account, call).await?;

        Ok((list, hash))
    }

    /// Read every entry of `address`, in id order. Entries whose view call
    /// fails are skipped.
    pub async fn list_entries(&self, address: AccountAddress) -> RelayResult<Vec<Entry>> {
        let resource = self
            .chain
            .account_resource(address, &self.list_resource_type())
            .await
            .map_err(|e| RelayError::Query(e.to_string()))?
            .ok_or_else(|| RelayError::ResourceNotFound("Resource not found".to_string()))?;

        let counter = resource
            .get(ENTRY_COUNTER)
            .and_then(de::u64_from_value)
            .ok_or_else(|| {
                RelayError::ResourceNotFound(format!("{} not found in resource", ENTRY_COUNTER))
            })?;

        if counter > MAX_LISTED_ENTRIES {
            return Err(RelayError::Query(format!(
                "{} {} exceeds the listing limit of {}",
                ENTRY_COUNTER, counter, MAX_LISTED_ENTRIES
            )));
        }

        let function = format!("{}::{}", self.module, GET_ENTRY);
        let mut entries = Vec::with_capacity(counter as usize);

        for id in 1..=counter {
            let arguments = vec![json!(address.to_string()), json!(id.to_string())];
            match self.chain.view(&function, arguments).await {
                Ok(values) => match decode_entry(values, id) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => {
                        tracing::warn!(account = %address, entry_id = id, error = %e, "Skipping undecodable entry")
                    }
                },
                Err(e) => {
                    tracing::warn!(account = %address, entry_id = id, error = %e, "Failed to fetch entry")
                }
            }
        }

        tracing::debug!(account = %address, counter, fetched = entries.len(), "Entries listed");
        Ok(entries)
    }

    async fn submit(&self, account: &LocalAccount, call: EntryFunction) -> RelayResult<String> {
        let function = call.function.clone();
        match self.chain.submit_and_wait(account, call).await {
            Ok(hash) => {
                metrics::record_transaction("move", &function, true);
                Ok(hash)
            }
            Err(e) => {
                metrics::record_transaction("move", &function, false);
                Err(RelayError::TransactionFailed(e.to_string()))
            }
        }
    }
}

fn decode_entry(values: Vec<Value>, id: u64) -> Result<Entry, ChainError> {
    let value = values
        .into_iter()
        .next()
        .ok_or_else(|| ChainError::Decode("empty view result".to_string()))?;
    let mut entry: Entry =
        serde_json::from_value(value).map_err(|e| ChainError::Decode(e.to_string()))?;
    entry.id.get_or_insert(id);
    Ok(entry)
}
