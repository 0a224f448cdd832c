//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (requests, latency, collaborator outcomes)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `cep_weather_requests_total` (counter): requests by service, status
//! - `cep_weather_request_duration_seconds` (histogram): latency distribution
//! - `cep_weather_collaborator_calls_total` (counter): outbound calls by collaborator, outcome
//!
//! # Design Decisions
//! - Recording is unconditional; without an installed recorder it is a no-op
//! - Labels are low-cardinality (never the postal code or locality)

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder"),
    }
}

/// Record a completed inbound request.
pub fn record_request(service: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "cep_weather_requests_total",
        "service" => service,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("cep_weather_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of a call to an external collaborator.
pub fn record_collaborator_call(collaborator: &'static str, outcome: &'static str) {
    metrics::counter!(
        "cep_weather_collaborator_calls_total",
        "collaborator" => collaborator,
        "outcome" => outcome
    )
    .increment(1);
}
