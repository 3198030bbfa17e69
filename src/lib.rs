//! Entry relay library.
//!
//! A custodial HTTP relay that signs and submits ledger transactions on a
//! caller's behalf: Move-chain entry lists over the node REST API, and an
//! EVM entity registry over JSON-RPC.

pub mod config;
pub mod credential;
pub mod error;
pub mod evm;
pub mod http;
pub mod lifecycle;
pub mod move_chain;
pub mod observability;

pub use config::schema::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use http::{build_router, AppState, HttpServer};
