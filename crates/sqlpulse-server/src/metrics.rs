//! Prometheus metrics recorder and `/metrics` endpoint handler.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the `PrometheusHandle` used to render the `/metrics` endpoint.
/// Must be called once at server startup before any metrics are recorded.
pub fn install_recorder() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install metrics recorder");
    info!("prometheus metrics recorder installed");
    handle
}

/// Render Prometheus text format from the installed recorder.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}

// Metric name constants to avoid typos across crates.

/// Queries executed total (counter, labels: outcome).
pub const QUERIES_EXECUTED_TOTAL: &str = "queries_executed_total";
/// Events accepted into the hub ingestion queue (counter).
pub const HUB_PUBLISHES_TOTAL: &str = "hub_publishes_total";
/// Events dropped because the ingestion queue was full (counter).
pub const HUB_PUBLISH_DROPS_TOTAL: &str = "hub_publish_drops_total";
/// Frames dropped on full subscriber queues (counter).
pub const WS_BROADCAST_DROPS_TOTAL: &str = "ws_broadcast_drops_total";
/// Slow subscribers evicted past the drop threshold (counter).
pub const WS_EVICTIONS_TOTAL: &str = "ws_evictions_total";
/// WebSocket connections opened total (counter).
pub const WS_CONNECTIONS_TOTAL: &str = "ws_connections_total";
/// WebSocket disconnections total (counter).
pub const WS_DISCONNECTIONS_TOTAL: &str = "ws_disconnections_total";
/// Active WebSocket subscribers (gauge).
pub const WS_SUBSCRIBERS_ACTIVE: &str = "ws_subscribers_active";
