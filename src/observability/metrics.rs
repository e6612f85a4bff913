//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): REST requests by route
//! - `gateway_notifications_total` (counter): dispatched events by stream
//! - `gateway_node_errors_total` (counter): requests the node failed
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic counters)
//! - Exporter is optional; recording without it installed is a no-op

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(_) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(error) => tracing::error!(error = %error, "Failed to start metrics exporter"),
    }
}

/// Count one REST request on the given route.
pub fn record_request(route: &'static str) {
    counter!("gateway_requests_total", "route" => route).increment(1);
}

/// Count one notification dispatched on the given stream.
pub fn record_notification(stream: &'static str) {
    counter!("gateway_notifications_total", "stream" => stream).increment(1);
}

/// Count one request the node rejected or failed.
pub fn record_node_error() {
    counter!("gateway_node_errors_total").increment(1);
}
