//! Pico y placa: plate restriction line protocol server and client.

pub mod config;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod protocol;

pub use config::ServerConfig;
pub use lifecycle::Shutdown;
pub use net::{ProtocolClient, Server};
pub use protocol::{Dispatcher, Request, Response};
