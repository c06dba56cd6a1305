//! Metrics collection and exposition.
//!
//! # Metrics
//! - `content_router_requests_total` (counter): requests by outcome, status
//! - `content_router_request_duration_seconds` (histogram): latency distribution
//! - `content_router_auth_total` (counter): auth checks by method, result
//! - `content_router_object_bytes_total` (counter): bytes served from the store
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Prometheus endpoint only when an address is configured

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished content request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "content_router_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("content_router_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record one authentication decision.
pub fn record_auth(method: &'static str, result: &'static str) {
    metrics::counter!("content_router_auth_total", "method" => method, "result" => result)
        .increment(1);
}

pub fn record_object_bytes(len: usize) {
    metrics::counter!("content_router_object_bytes_total").increment(len as u64);
}
