//! EVM integration subsystem.
//!
//! # Data Flow
//! ```text
//! Request credential
//!     → wallet.rs (secp256k1 signer bound to chain id)
//!     → client.rs (RPC connection with timeouts, signing providers)
//!     → registry.rs (addEntity send + receipt, getEntitiesByUser view)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when the chain is unreachable at startup

pub mod client;
pub mod registry;
pub mod types;
pub mod wallet;

pub use client::EvmClient;
pub use registry::{EntityRelay, RegistryClient};
pub use types::{EvmEntity, EvmError, EvmResult};
pub use wallet::Wallet;

use crate::config::EvmConfig;

/// Connect to the configured chain and bind the registry contract.
pub async fn build_registry(config: &EvmConfig) -> EvmResult<RegistryClient> {
    let client = EvmClient::new(config.clone()).await?;
    RegistryClient::new(client)
}
