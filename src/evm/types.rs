//! EVM-specific types and error definitions.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during EVM operations.
#[derive(Debug, Error)]
pub enum EvmError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was mined but reverted.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Contract call could not be built or sent.
    #[error("Contract call failed: {0}")]
    Contract(String),

    /// Invalid private key or signer construction error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Configured address could not be parsed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for EVM operations.
pub type EvmResult<T> = Result<T, EvmError>;

/// An entity as stored by the registry contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmEntity {
    pub id: u64,
    pub user: Address,
    pub data_uri: String,
    pub timestamp: u64,
}
