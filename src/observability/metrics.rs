//! Metrics collection and exposition.
//!
//! # Metrics
//! - `placa_requests_total` (counter): requests by command, status
//! - `placa_connections_active` (gauge): current connection count
//! - `placa_transport_errors_total` (counter): connections ended by I/O failure
//!
//! Recording goes through the `metrics` facade and costs nothing until an
//! exporter is installed with [`init_metrics`].

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::protocol::{Command, Status};

/// Install the Prometheus exporter with an HTTP scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one dispatched request. Unrecognized commands share one label.
pub fn record_request(command: Option<Command>, status: Status) {
    let command = command.map(|c| c.name()).unwrap_or("UNKNOWN");
    metrics::counter!(
        "placa_requests_total",
        "command" => command,
        "status" => status.as_str()
    )
    .increment(1);
}

pub fn record_connection_opened() {
    metrics::gauge!("placa_connections_active").increment(1.0);
}

pub fn record_connection_closed() {
    metrics::gauge!("placa_connections_active").decrement(1.0);
}

pub fn record_transport_error() {
    metrics::counter!("placa_transport_errors_total").increment(1);
}
