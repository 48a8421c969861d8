//! Startup orchestration.
//!
//! Order: metrics exporter (if enabled), then the listener, then the
//! accept loop. Any startup error is fatal.

use std::net::SocketAddr;

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;
use crate::net::{Listener, ListenerError, Server, ServerError};
use crate::observability::metrics;
use crate::protocol::AccessCoin;

/// A server running on a background task.
pub struct RunningServer {
    pub local_addr: SocketAddr,
    pub handle: JoinHandle<Result<(), ServerError>>,
}

/// Bind `server`'s listener and spawn its accept loop.
pub async fn launch<C: AccessCoin + 'static>(
    server: Server<C>,
    shutdown: &Shutdown,
) -> Result<RunningServer, ListenerError> {
    let observability = &server.config().observability;
    if observability.metrics_enabled {
        match observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = Listener::bind(&server.config().listener).await?;
    let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Ok(RunningServer { local_addr, handle })
}
