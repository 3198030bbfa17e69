//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize chain clients for the enabled paths
//! - Start the metrics exporter
//! - Assemble the shared application state
//!
//! Fail fast: any startup error is fatal. Chain reachability is not checked
//! here beyond what the clients log themselves.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::evm::{self, EvmError};
use crate::http::AppState;
use crate::move_chain::{self, ChainError};
use crate::observability::metrics;

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Move chain setup failed: {0}")]
    MoveChain(#[from] ChainError),

    #[error("EVM setup failed: {0}")]
    Evm(#[from] EvmError),

    #[error("Invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Build the application state for `config`, initializing subsystems in
/// dependency order.
pub async fn initialize(config: &RelayConfig) -> Result<AppState, StartupError> {
    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr);
    }

    let entries = if config.move_chain.enabled {
        Some(Arc::new(move_chain::build_service(&config.move_chain)?))
    } else {
        tracing::info!("Move chain endpoints disabled");
        None
    };

    let entities: Option<Arc<dyn evm::EntityRelay>> = if config.evm.enabled {
        Some(Arc::new(evm::build_registry(&config.evm).await?))
    } else {
        tracing::info!("EVM endpoints disabled");
        None
    };

    Ok(AppState { entries, entities })
}
