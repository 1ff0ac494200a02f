//! Metrics collection and exposition.
//!
//! # Metrics
//! - `contacts_requests_total` (counter): requests by method, status, operation
//! - `contacts_request_duration_seconds` (histogram): latency by operation
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until an
//!   exporter is installed
//! - Prometheus scrape endpoint on its own listener

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Initialize the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
///
/// `operation` is the dispatched operation name, or `none` when the request
/// never reached one.
pub fn record_request(method: &str, status: u16, operation: &'static str, start: Instant) {
    counter!(
        "contacts_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "operation" => operation
    )
    .increment(1);

    histogram!(
        "contacts_request_duration_seconds",
        "operation" => operation
    )
    .record(start.elapsed().as_secs_f64());
}
