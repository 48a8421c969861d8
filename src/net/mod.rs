//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → connection.rs (lifecycle tracking, connection IDs)
//!     → server.rs (per-connection task)
//!         → framing.rs (newline-delimited lines, bounded)
//!         → protocol::Dispatcher
//!
//! Outgoing (client role):
//!     client.rs → framing.rs → server
//! ```
//!
//! # Design Decisions
//! - Bounded accept via semaphore prevents resource exhaustion
//! - Each connection tracked for graceful shutdown
//! - The peer address string is the client identity handed to the dispatcher

pub mod client;
pub mod connection;
pub mod framing;
pub mod listener;
pub mod server;

pub use client::{ClientError, ProtocolClient};
pub use listener::{Listener, ListenerError};
pub use server::{Server, ServerError};
