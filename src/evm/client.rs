//! EVM RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Verify the chain id at startup
//! - Provide a read-only provider and per-request signing providers
//! - Provide health check for chain connectivity

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::EvmConfig;
use crate::evm::types::{EvmError, EvmResult};
use crate::evm::wallet::Wallet;
use crate::observability::metrics;

/// EVM RPC client wrapper.
#[derive(Clone)]
pub struct EvmClient {
    /// Read-only provider.
    provider: DynProvider,
    /// Parsed RPC endpoint, reused for signing providers.
    rpc_url: url::Url,
    /// Configuration.
    config: EvmConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl EvmClient {
    /// Create a new EVM client.
    ///
    /// A chain id mismatch or unreachable node is logged but does not fail
    /// construction.
    pub async fn new(config: EvmConfig) -> EvmResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);

        let rpc_url: url::Url = config.rpc_url.parse().map_err(|e| {
            EvmError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new().connect_http(rpc_url.clone()).erased();

        let client = Self {
            provider,
            rpc_url,
            config: config.clone(),
            timeout_duration,
        };

        // Verify chain ID matches configuration
        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "EVM client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "EVM client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> EvmResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id != self.config.chain_id {
            return Err(EvmError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> EvmResult<u64> {
        match timeout(self.timeout_duration, self.provider.get_chain_id()).await {
            Ok(Ok(id)) => Ok(id),
            Ok(Err(e)) => Err(EvmError::Rpc(e.to_string())),
            Err(_) => Err(EvmError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> EvmResult<u64> {
        match timeout(self.timeout_duration, self.provider.get_block_number()).await {
            Ok(Ok(block)) => Ok(block),
            Ok(Err(e)) => Err(EvmError::Rpc(e.to_string())),
            Err(_) => Err(EvmError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Check if the chain is reachable.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_chain_health("evm", healthy);
        healthy
    }

    /// Provider that signs with `wallet`; nonce, gas, and chain id are filled
    /// from the node.
    pub fn signing_provider(&self, wallet: Wallet) -> DynProvider {
        ProviderBuilder::new()
            .wallet(wallet.into_network_wallet())
            .connect_http(self.rpc_url.clone())
            .erased()
    }

    /// Get the read-only provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Get the configuration.
    pub fn config(&self) -> &EvmConfig {
        &self.config
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout_duration
    }
}

impl std::fmt::Debug for EvmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
