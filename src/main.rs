//! Entry relay (v1)
//!
//! Signs and submits ledger transactions for callers that hand over a key.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ handlers ──▶ move_chain::EntryService ──▶ node REST API
//!                         │                   └──▶ evm::RegistryClient ──────▶ JSON-RPC
//!                         ▼
//!     Client Response ◀── response (status mapping, metrics)
//!
//!     Cross-cutting: config, observability, lifecycle
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use entry_relay::config::{load_config, RelayConfig};
use entry_relay::http::HttpServer;
use entry_relay::lifecycle;
use entry_relay::observability::logging;

#[derive(Parser)]
#[command(name = "entry-relay")]
#[command(about = "Transaction relay for Move-chain entry lists and an EVM entity registry", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Built-in defaults apply without it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("entry-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        move_chain = config.move_chain.enabled,
        evm = config.evm.enabled,
        "Configuration loaded"
    );

    let state = lifecycle::initialize(&config).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, state);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
