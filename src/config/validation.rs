//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check chain settings only for enabled chains
//!
//! Returns all validation errors, not just the first.

use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    let move_chain = &config.move_chain;
    if move_chain.enabled {
        if url::Url::parse(&move_chain.node_url).is_err() {
            errors.push(ValidationError::new(
                "move_chain.node_url",
                format!("'{}' is not a URL", move_chain.node_url),
            ));
        }
        if crate::move_chain::AccountAddress::from_hex(&move_chain.module_address).is_err() {
            errors.push(ValidationError::new(
                "move_chain.module_address",
                "must be a hex account address",
            ));
        }
        if move_chain.module_name.is_empty() {
            errors.push(ValidationError::new("move_chain.module_name", "must not be empty"));
        }
        if move_chain.rpc_timeout_secs == 0 || move_chain.wait_timeout_secs == 0 {
            errors.push(ValidationError::new(
                "move_chain.timeouts",
                "rpc_timeout_secs and wait_timeout_secs must be > 0",
            ));
        }
        if move_chain.poll_interval_ms == 0 {
            errors.push(ValidationError::new("move_chain.poll_interval_ms", "must be > 0"));
        }
    }

    let evm = &config.evm;
    if evm.enabled {
        if url::Url::parse(&evm.rpc_url).is_err() {
            errors.push(ValidationError::new(
                "evm.rpc_url",
                format!("'{}' is not a URL", evm.rpc_url),
            ));
        }
        if evm.contract_address.parse::<alloy::primitives::Address>().is_err() {
            errors.push(ValidationError::new(
                "evm.contract_address",
                "must be a 20-byte hex address",
            ));
        }
        if evm.rpc_timeout_secs == 0 || evm.receipt_timeout_secs == 0 {
            errors.push(ValidationError::new(
                "evm.timeouts",
                "rpc_timeout_secs and receipt_timeout_secs must be > 0",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
