//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (RPS, latency, route table size)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `sitemap_requests_total` (counter): total requests by method, status, route
//! - `sitemap_request_duration_seconds` (histogram): latency distribution
//! - `sitemap_routes` (gauge): number of compiled routes
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Route label is the matched template, never the raw path
//! - Recording without an installed exporter is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Route label for requests no route matched.
pub const UNMATCHED_ROUTE: &str = "none";

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("sitemap_requests_total", "Total requests answered");
    describe_histogram!(
        "sitemap_request_duration_seconds",
        "Time from request receipt to response"
    );
    describe_gauge!("sitemap_routes", "Routes in the compiled sitemap");

    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record one answered request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("route", route.to_string()),
    ];
    counter!("sitemap_requests_total", &labels).increment(1);
    histogram!("sitemap_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_route_count(count: usize) {
    gauge!("sitemap_routes").set(count as f64);
}
