//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Prometheus exposition on a dedicated listener, scrape-pull model
//! - Route label uses the gateway's route identifiers, `none` for misses

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::auth::RouteId;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to install is logged, not fatal: the gateway serves traffic
/// without metrics rather than refusing to start.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(%error, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, route: Option<RouteId>, status: u16, start: Instant) {
    let route_label = route.map(RouteId::as_str).unwrap_or("none");

    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "route" => route_label,
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("gateway_request_duration_seconds", "route" => route_label)
        .record(start.elapsed().as_secs_f64());
}
