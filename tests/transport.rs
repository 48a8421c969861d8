//! Framing, limits and shutdown behavior seen from a raw socket.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use pico_placa::protocol::FixedCoin;
use pico_placa::{ProtocolClient, Server, Shutdown};

mod common;

async fn read_line(reader: &mut BufReader<TcpStream>) -> String {
    let mut line = String::new();
    tokio::time::timeout(common::TIMEOUT, reader.read_line(&mut line))
        .await
        .expect("response timed out")
        .unwrap();
    line
}

#[tokio::test]
async fn pipelined_crlf_requests_are_answered_in_order() {
    let server = common::start_server(FixedCoin(true)).await;
    let stream = TcpStream::connect(server.addr).await.unwrap();
    let mut stream = BufReader::new(stream);

    stream
        .get_mut()
        .write_all(b"CONTADOR\r\ncalculo 1 2 MNO4560\r\ncontador\r\n")
        .await
        .unwrap();

    assert_eq!(read_line(&mut stream).await, "NOK No hay solicitudes previas\n");
    assert_eq!(read_line(&mut stream).await, "OK MNO4560 2\n");
    assert_eq!(read_line(&mut stream).await, "OK 1\n");
}

#[tokio::test]
async fn overlong_line_is_rejected_and_connection_closed() {
    let mut config = common::test_config();
    config.limits.max_line_bytes = 32;
    let server = common::start_server_with(config, FixedCoin(true)).await;

    let stream = TcpStream::connect(server.addr).await.unwrap();
    let mut stream = BufReader::new(stream);
    let long = format!("CALCULO {} b ABC1234\n", "a".repeat(64));
    stream.get_mut().write_all(long.as_bytes()).await.unwrap();

    assert_eq!(read_line(&mut stream).await, "NOK Comando no reconocido\n");

    let mut rest = Vec::new();
    let n = tokio::time::timeout(common::TIMEOUT, stream.read_to_end(&mut rest))
        .await
        .expect("connection was not closed")
        .unwrap_or(0);
    assert_eq!(n, 0);
    assert!(server.counters.is_empty());
}

#[tokio::test]
async fn idle_connection_is_closed() {
    let mut config = common::test_config();
    config.timeouts.idle_secs = 1;
    let server = common::start_server_with(config, FixedCoin(true)).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    let mut buf = [0u8; 16];
    let n = tokio::time::timeout(Duration::from_secs(3), stream.read(&mut buf))
        .await
        .expect("idle connection stayed open")
        .unwrap_or(0);
    assert_eq!(n, 0);
}

#[tokio::test]
async fn shutdown_stops_accept_loop_and_closes_connections() {
    let mut config = common::test_config();
    config.listener.max_connections = 4;

    let server = Server::new(config);
    let tracker = server.tracker().clone();
    let shutdown = Shutdown::new();
    let running = pico_placa::lifecycle::launch(server, &shutdown).await.unwrap();

    let mut client = ProtocolClient::connect(running.local_addr, common::TIMEOUT)
        .await
        .unwrap();
    assert!(client.calculate("a", "b", "JKL3333").await.unwrap().is_ok());
    assert_eq!(tracker.active_count(), 1);

    // The accept loop plus the one open connection.
    assert_eq!(shutdown.trigger(), 2);
    let result = tokio::time::timeout(Duration::from_secs(10), running.handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(tracker.active_count(), 0);

    assert!(client.count().await.is_err());
}
