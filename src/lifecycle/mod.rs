//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Initialize chain clients → Start listener
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop accepting → drain in-flight requests → exit
//! ```

pub mod signals;
pub mod startup;

pub use signals::shutdown_signal;
pub use startup::{initialize, StartupError};
