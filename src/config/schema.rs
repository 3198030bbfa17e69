//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Move chain (Aptos REST) settings.
    pub move_chain: MoveChainConfig,

    /// EVM chain settings.
    pub evm: EvmConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    ///
    /// Must cover two finality waits for a first `create-entry`.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 120 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Move chain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MoveChainConfig {
    /// Enable the Move chain endpoints.
    pub enabled: bool,

    /// Node REST endpoint, including the `/v1` suffix.
    pub node_url: String,

    /// Account that published the entry module.
    pub module_address: String,

    /// Name of the entry module.
    pub module_name: String,

    /// Maximum gas units a relayed transaction may consume.
    pub max_gas_amount: u64,

    /// Gas unit price in octas.
    pub gas_unit_price: u64,

    /// Transaction expiration, in seconds from build time.
    pub expiration_secs: u64,

    /// Per-call REST timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a submitted transaction to commit.
    pub wait_timeout_secs: u64,

    /// Interval between commit polls, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for MoveChainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            node_url: "https://api.testnet.aptoslabs.com/v1".to_string(),
            module_address: "0xde5d94dac0db9e017d907b6e02a6d4274e0e2fbbe018e3a698d81e8da2028477"
                .to_string(),
            module_name: "vortexengine".to_string(),
            max_gas_amount: 100_000,
            gas_unit_price: 100,
            expiration_secs: 600,
            rpc_timeout_secs: 10,
            wait_timeout_secs: 30,
            poll_interval_ms: 500,
        }
    }
}

/// EVM integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EvmConfig {
    /// Enable the EVM endpoints.
    pub enabled: bool,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// Address of the EntityRegistry contract.
    pub contract_address: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required before responding.
    pub confirmation_blocks: u64,

    /// Maximum time to wait for a receipt, in seconds.
    pub receipt_timeout_secs: u64,
}

impl Default for EvmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            contract_address: String::new(),
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            receipt_timeout_secs: 60,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert!(config.move_chain.enabled);
        assert!(!config.evm.enabled);
        assert_eq!(config.move_chain.module_name, "vortexengine");
    }

    #[test]
    fn test_partial_toml() {
        let config: RelayConfig = toml::from_str(
            r#"
            [evm]
            enabled = true
            contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            "#,
        )
        .unwrap();
        assert!(config.evm.enabled);
        assert_eq!(config.evm.chain_id, 31337);
        assert_eq!(config.move_chain.gas_unit_price, 100);
    }
}
