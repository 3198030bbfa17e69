//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by endpoint, status
//! - `relay_request_duration_seconds` (histogram): handler latency
//! - `relay_transactions_total` (counter): submitted transactions by chain,
//!   function, outcome
//! - `relay_chain_health` (gauge): 1=reachable, 0=unreachable
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    let status = status.to_string();
    ::metrics::counter!("relay_requests_total", "endpoint" => endpoint, "status" => status)
        .increment(1);
    ::metrics::histogram!("relay_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record one transaction outcome.
pub fn record_transaction(chain: &'static str, function: &str, success: bool) {
    let outcome = if success { "confirmed" } else { "failed" };
    ::metrics::counter!(
        "relay_transactions_total",
        "chain" => chain,
        "function" => function.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record reachability of a chain endpoint.
pub fn record_chain_health(chain: &'static str, healthy: bool) {
    ::metrics::gauge!("relay_chain_health", "chain" => chain).set(if healthy { 1.0 } else { 0.0 });
}
