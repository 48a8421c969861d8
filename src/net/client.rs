//! Client side of the line protocol.
//!
//! One connection carries any number of exchanges. Each exchange writes a
//! request line and waits for exactly one response line. The server keys
//! its counters by peer address, so CONTADOR only sees CALCULO requests
//! sent earlier on the same connection.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::config::ServerConfig;
use crate::net::framing::{read_frame, write_frame, Frame};
use crate::protocol::{decode, decode_response, CodecError, Command, Request, Response};

/// Longest response line the client accepts.
pub const MAX_RESPONSE_BYTES: usize = 1024;

/// Errors surfaced to callers of [`ProtocolClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport failed; the exchange is aborted and not retried.
    #[error("operation failed: {0}")]
    OperationFailed(#[source] std::io::Error),

    /// The server answered with a line that is not a response.
    #[error("malformed response: {0}")]
    Codec(#[from] CodecError),
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::OperationFailed(e)
    }
}

fn io_error(kind: std::io::ErrorKind, msg: &str) -> ClientError {
    ClientError::OperationFailed(std::io::Error::new(kind, msg.to_string()))
}

/// A connected protocol client.
pub struct ProtocolClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    timeout: Duration,
}

impl ProtocolClient {
    /// Connect to `addr`. `timeout` bounds the connect and every exchange.
    pub async fn connect<A: ToSocketAddrs>(addr: A, timeout: Duration) -> Result<Self, ClientError> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| io_error(std::io::ErrorKind::TimedOut, "connect timed out"))??;

        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
            timeout,
        })
    }

    /// Connect to `listener.bind_address`, bounded by `timeouts.connect_secs`.
    pub async fn connect_with_config(config: &ServerConfig) -> Result<Self, ClientError> {
        let timeout = Duration::from_secs(config.timeouts.connect_secs);
        Self::connect(config.listener.bind_address.as_str(), timeout).await
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `request` and wait for its response.
    pub async fn execute(&mut self, request: &Request) -> Result<Response, ClientError> {
        let line = request.to_line();
        tracing::debug!(request = %line, "Sending request");

        let frame = tokio::time::timeout(self.timeout, async {
            write_frame(&mut self.writer, &line).await?;
            read_frame(&mut self.reader, MAX_RESPONSE_BYTES).await
        })
        .await
        .map_err(|_| io_error(std::io::ErrorKind::TimedOut, "no response before timeout"))??;

        match frame {
            Frame::Line(line) => Ok(decode_response(&line)?),
            Frame::Eof => Err(io_error(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed by server",
            )),
            Frame::TooLong => Err(io_error(
                std::io::ErrorKind::InvalidData,
                "response line exceeds limit",
            )),
        }
    }

    /// `INGRESO user password`
    pub async fn login(&mut self, user: &str, password: &str) -> Result<Response, ClientError> {
        self.execute(&Request::new(Command::Login.name(), [user, password]))
            .await
    }

    /// `CALCULO first second plate`
    pub async fn calculate(
        &mut self,
        first: &str,
        second: &str,
        plate: &str,
    ) -> Result<Response, ClientError> {
        self.execute(&Request::new(Command::Calculate.name(), [first, second, plate]))
            .await
    }

    /// `CONTADOR`
    pub async fn count(&mut self) -> Result<Response, ClientError> {
        self.execute(&Request::new(Command::Count.name(), Vec::<String>::new()))
            .await
    }

    /// Send each non-blank line of `input` as a request on this connection,
    /// writing every response line to `output`. Stops at EOF or at the first
    /// failed exchange. Returns the number of exchanges completed.
    pub async fn run_session<R, W>(&mut self, input: R, output: &mut W) -> Result<usize, ClientError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut exchanges = 0;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response = self.execute(&decode(&line)).await?;
            write_frame(output, &response.to_string()).await?;
            exchanges += 1;
        }

        Ok(exchanges)
    }
}
