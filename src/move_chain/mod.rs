//! Move chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Request credential
//!     → account.rs (ed25519 key, derived address)
//!     → entries.rs (ensure list, create entry, list entries)
//!     → transaction.rs (entry-function payload, BCS, signing)
//!     → client.rs (REST: resources, submit, wait, view)
//! ```
//!
//! # Security Constraints
//! - Keys arrive per request and are dropped when the request ends
//! - Never log private keys; log derived addresses only

pub mod account;
pub mod client;
pub mod entries;
pub mod transaction;
pub mod types;

pub use account::LocalAccount;
pub use client::{MoveChain, RestClient};
pub use entries::EntryService;
pub use transaction::{EntryFunction, ModuleId};
pub use types::{AccountAddress, ChainError, ChainResult, Entry, ListStatus};

use std::sync::Arc;

use crate::config::MoveChainConfig;

/// Build the entry service for `config` over the REST client.
pub fn build_service(config: &MoveChainConfig) -> ChainResult<EntryService> {
    let module = ModuleId {
        address: AccountAddress::from_hex(&config.module_address)?,
        name: config.module_name.clone(),
    };
    let client = RestClient::new(config.clone())?;
    Ok(EntryService::new(Arc::new(client), module))
}
