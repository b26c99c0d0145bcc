//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wallet_send_total` (counter): send runs by outcome and final stage
//! - `wallet_send_duration_seconds` (histogram): end-to-end send latency
//! - `wallet_http_requests_total` (counter): HTTP calls by procedure and result code
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the end of one send run.
pub fn record_send(outcome: &'static str, stage: &'static str, start: Instant) {
    metrics::counter!("wallet_send_total", "outcome" => outcome, "stage" => stage).increment(1);
    metrics::histogram!("wallet_send_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record one HTTP procedure call.
pub fn record_http_request(procedure: &'static str, result: u8) {
    metrics::counter!(
        "wallet_http_requests_total",
        "procedure" => procedure,
        "result" => result.to_string()
    )
    .increment(1);
}
