//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rr_proxy_requests_total` (counter): requests by method, status, backend
//! - `rr_proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `rr_proxy_backend_health` (gauge): 1=healthy, 0=unhealthy
//! - `rr_proxy_probe_latency_seconds` (histogram): health probe latency
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Backend label used when no server was selected.
pub const NO_BACKEND: &str = "none";

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, backend: &str, start: Instant) {
    counter!(
        "rr_proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "backend" => backend.to_string()
    )
    .increment(1);
    histogram!(
        "rr_proxy_request_duration_seconds",
        "method" => method.to_string(),
        "backend" => backend.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_health(backend: &str, healthy: bool) {
    gauge!("rr_proxy_backend_health", "backend" => backend.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_probe_latency(backend: &str, latency: Duration) {
    histogram!("rr_proxy_probe_latency_seconds", "backend" => backend.to_string())
        .record(latency.as_secs_f64());
}
