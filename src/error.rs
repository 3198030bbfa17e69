//! Request-level error taxonomy.
//!
//! Chain modules have their own error types (`move_chain::ChainError`,
//! `evm::EvmError`); the services translate them into [`RelayError`] so the
//! HTTP layer maps one enum to status codes.

use thiserror::Error;

/// Errors that terminate a relayed request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Private key is not 32 bytes of hex.
    #[error("{0}")]
    InvalidCredential(String),

    /// Required request field absent or empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Request field present but malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Prerequisite resource already exists.
    #[error("{0}")]
    DuplicateResource(String),

    /// On-chain resource absent.
    #[error("{0}")]
    ResourceNotFound(String),

    /// Signing, submission, or finality wait failed. Carries the chain
    /// client's message verbatim.
    #[error("{0}")]
    TransactionFailed(String),

    /// A read-only chain query failed.
    #[error("Chain query failed: {0}")]
    Query(String),

    /// The chain path serving this endpoint is disabled.
    #[error("{0} is disabled")]
    Unavailable(&'static str),
}

/// Result type for relayed operations.
pub type RelayResult<T> = Result<T, RelayError>;
