//! Metrics collection and exposition.
//!
//! # Metrics
//! - `feed_proxy_requests_total` (counter): requests by outcome, status
//! - `feed_proxy_request_duration_seconds` (histogram): latency by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Outcome labels are a small fixed set to keep cardinality bounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "feed_proxy_requests_total";
pub const REQUEST_DURATION: &str = "feed_proxy_request_duration_seconds";

/// Install the Prometheus exporter with an HTTP scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(outcome: &'static str, status: u16, start_time: Instant) {
    metrics::counter!(REQUESTS_TOTAL, "outcome" => outcome, "status" => status.to_string())
        .increment(1);
    metrics::histogram!(REQUEST_DURATION, "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}
