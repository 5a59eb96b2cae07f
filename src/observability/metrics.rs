//! Metrics collection and exposition.
//!
//! # Metrics
//! - `agent_refresh_total` (counter): refresh attempts by outcome
//!   (`skipped`, `unchanged`, `rebuilt`, `failed`)
//! - `agent_snapshot_version` (gauge): version of the published snapshot
//! - `agent_rebuild_duration_seconds` (histogram): time spent building a snapshot
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_refresh(outcome: &'static str) {
    metrics::counter!("agent_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_snapshot_version(version: u64) {
    metrics::gauge!("agent_snapshot_version").set(version as f64);
}

pub fn record_rebuild_duration(elapsed: Duration) {
    metrics::histogram!("agent_rebuild_duration_seconds").record(elapsed.as_secs_f64());
}
