//! Metrics collection and exposition.
//!
//! # Metrics
//! - `storefront_requests_total` (counter): forwarded requests by method,
//!   status, upstream
//! - `storefront_request_duration_seconds` (histogram): latency distribution
//!
//! Recording is unconditional; without an installed exporter the macros are
//! no-ops, so the passthrough path pays nothing when metrics are disabled.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(error = %error, "Failed to install metrics exporter"),
    }
}

/// Record one forwarded request.
pub fn record_request(method: &str, status: u16, upstream: &str, start: Instant) {
    metrics::counter!(
        "storefront_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "upstream" => upstream.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "storefront_request_duration_seconds",
        "upstream" => upstream.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
