//! Line protocol server.
//!
//! # Responsibilities
//! - Run the accept loop until shutdown
//! - Spawn one task per connection
//! - Frame lines, dispatch them, write responses
//! - Close idle or misbehaving connections
//! - Drain live connections on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::net::TcpStream;
use tokio::sync::broadcast;

use crate::config::ServerConfig;
use crate::net::connection::{ConnectionGuard, ConnectionTracker};
use crate::net::framing::{discard_line, read_frame, write_frame, Frame};
use crate::net::listener::{ConnectionPermit, Listener, ListenerError};
use crate::observability::metrics;
use crate::protocol::dispatcher::MSG_UNKNOWN_COMMAND;
use crate::protocol::{
    decode, encode, AccessCoin, ClientCounters, Command, Dispatcher, RandomCoin, Response, Status,
};

/// How long shutdown waits for open connections to finish.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause after a failed accept so a persistent error does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Per-connection limits taken from the config.
#[derive(Debug, Clone, Copy)]
struct ConnectionSettings {
    idle_timeout: Duration,
    max_line_bytes: usize,
}

impl From<&ServerConfig> for ConnectionSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            idle_timeout: Duration::from_secs(config.timeouts.idle_secs),
            max_line_bytes: config.limits.max_line_bytes,
        }
    }
}

/// TCP server for the plate restriction protocol.
pub struct Server<C = RandomCoin> {
    config: ServerConfig,
    dispatcher: Arc<Dispatcher<C>>,
    tracker: ConnectionTracker,
}

impl Server<RandomCoin> {
    /// Create a server with fresh counters and a fair login coin.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_dispatcher(config, Dispatcher::new(ClientCounters::new()))
    }
}

impl<C: AccessCoin + 'static> Server<C> {
    pub fn with_dispatcher(config: ServerConfig, dispatcher: Dispatcher<C>) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
            tracker: ConnectionTracker::new(),
        }
    }

    /// Counters shared by every connection of this server.
    pub fn counters(&self) -> &ClientCounters {
        self.dispatcher.counters()
    }

    pub fn tracker(&self) -> &ConnectionTracker {
        &self.tracker
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Accept connections until `shutdown` fires, then drain.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let settings = ConnectionSettings::from(&self.config);

        if let Ok(addr) = listener.local_addr() {
            tracing::info!(address = %addr, "Server starting");
        }

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        let guard = self.tracker.track();
                        let dispatcher = Arc::clone(&self.dispatcher);
                        let shutdown = shutdown.resubscribe();
                        tokio::spawn(serve_connection(
                            stream, peer, dispatcher, settings, guard, permit, shutdown,
                        ));
                    }
                    Err(ListenerError::Accept(e)) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        if !self.tracker.wait_for_idle(DRAIN_TIMEOUT).await {
            tracing::warn!(
                active_connections = self.tracker.active_count(),
                "Drain timeout reached with connections still open"
            );
        }

        tracing::info!(clients = self.counters().len(), "Server stopped");
        Ok(())
    }
}

/// Serve one connection and log how it ended.
async fn serve_connection<C: AccessCoin>(
    stream: TcpStream,
    peer: SocketAddr,
    dispatcher: Arc<Dispatcher<C>>,
    settings: ConnectionSettings,
    guard: ConnectionGuard,
    _permit: ConnectionPermit,
    shutdown: broadcast::Receiver<()>,
) {
    let connection_id = guard.id();
    tracing::debug!(%connection_id, %peer, "Connection opened");

    if let Err(e) = handle_connection(stream, peer, &dispatcher, settings, shutdown).await {
        metrics::record_transport_error();
        tracing::warn!(%connection_id, %peer, error = %e, "Connection failed");
    }
}

/// Request/response loop for one connection.
///
/// Returns `Ok` on orderly close (EOF, idle timeout, shutdown, oversized
/// line) and `Err` on transport failure.
async fn handle_connection<C: AccessCoin>(
    stream: TcpStream,
    peer: SocketAddr,
    dispatcher: &Dispatcher<C>,
    settings: ConnectionSettings,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let client = peer.to_string();
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    loop {
        let frame = tokio::select! {
            _ = shutdown.recv() => return Ok(()),
            read = tokio::time::timeout(
                settings.idle_timeout,
                read_frame(&mut reader, settings.max_line_bytes),
            ) => match read {
                Ok(frame) => frame?,
                Err(_) => {
                    tracing::debug!(%client, "Idle timeout, closing connection");
                    return Ok(());
                }
            },
        };

        let line = match frame {
            Frame::Line(line) => line,
            Frame::Eof => {
                tracing::debug!(%client, "Client disconnected");
                return Ok(());
            }
            Frame::TooLong => {
                tracing::warn!(%client, limit = settings.max_line_bytes, "Request line too long");
                return reject_overlong(&mut reader, &mut writer, settings).await;
            }
        };

        let request = decode(&line);
        let response = dispatcher.dispatch(&request, &client);

        tracing::debug!(
            %client,
            command = request.command(),
            status = %response.status(),
            "Request handled"
        );
        metrics::record_request(Command::from_name(request.command()), response.status());

        write_frame(&mut writer, &encode(&response)).await?;
    }
}

/// Answer an oversized request line before the connection closes.
///
/// The rest of the line is consumed first so closing does not reset the
/// connection before the client reads the answer. A peer that never ends
/// the line is dropped silently after the idle timeout.
async fn reject_overlong<R, W>(
    reader: &mut R,
    writer: &mut W,
    settings: ConnectionSettings,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let discard = discard_line(reader, settings.max_line_bytes);
    match tokio::time::timeout(settings.idle_timeout, discard).await {
        Err(_) => return Ok(()),
        Ok(discarded) => {
            discarded?;
        }
    }

    metrics::record_request(None, Status::Nok);
    let response = Response::nok(MSG_UNKNOWN_COMMAND);
    write_frame(writer, &encode(&response)).await
}
