//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use pico_placa::config::ServerConfig;
use pico_placa::lifecycle::{self, RunningServer, Shutdown};
use pico_placa::protocol::{AccessCoin, ClientCounters, Dispatcher};
use pico_placa::{ProtocolClient, Server};

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// A server on an ephemeral port, stopped when the harness is dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    pub counters: ClientCounters,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub running: RunningServer,
}

impl TestServer {
    #[allow(dead_code)]
    pub async fn connect(&self) -> ProtocolClient {
        ProtocolClient::connect(self.addr, TIMEOUT).await.unwrap()
    }
}

pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config
}

/// Start a server whose login coin is `coin`.
pub async fn start_server_with<C: AccessCoin + 'static>(config: ServerConfig, coin: C) -> TestServer {
    let counters = ClientCounters::new();
    let server = Server::with_dispatcher(config, Dispatcher::with_coin(counters.clone(), coin));
    let shutdown = Shutdown::new();
    let running = lifecycle::launch(server, &shutdown).await.unwrap();

    TestServer {
        addr: running.local_addr,
        counters,
        shutdown,
        running,
    }
}

#[allow(dead_code)]
pub async fn start_server<C: AccessCoin + 'static>(coin: C) -> TestServer {
    start_server_with(test_config(), coin).await
}
