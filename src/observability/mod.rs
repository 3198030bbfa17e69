//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and chain clients produce:
//!     → logging.rs (structured log events, request-id spans)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
