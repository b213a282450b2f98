//! Integration tests for CalcServer
//!
//! These tests drive the server over real TCP connections with a plain line
//! client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use calcdev_device::DeviceRegistry;
use calcdev_engine::{CalculatorState, EndpointRouter};
use calcdev_network::{CalcServer, ServerConfig};
use futures::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::codec::{Framed, LinesCodec};

struct TestServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start(config: ServerConfig) -> Self {
        let router = EndpointRouter::new(Arc::new(CalculatorState::new()));
        let registry = Arc::new(DeviceRegistry::with_calculator(router, 91).unwrap());

        let server = CalcServer::bind(config, registry).await.unwrap();
        let addr = server.local_addr().unwrap();
        let (shutdown, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            server
                .run_until(async {
                    let _ = rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown,
            handle,
        }
    }

    async fn stop(self) {
        let _ = self.shutdown.send(());
        timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("Server shutdown timeout")
            .unwrap();
    }
}

fn local_config() -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        ..ServerConfig::default()
    }
}

async fn connect(addr: SocketAddr) -> Framed<TcpStream, LinesCodec> {
    let stream = TcpStream::connect(addr).await.unwrap();
    Framed::new(stream, LinesCodec::new())
}

async fn next_line(client: &mut Framed<TcpStream, LinesCodec>) -> String {
    timeout(Duration::from_secs(5), client.next())
        .await
        .expect("Response timeout")
        .expect("Connection closed")
        .unwrap()
}

async fn request(client: &mut Framed<TcpStream, LinesCodec>, line: &str) -> String {
    client.send(line.to_string()).await.unwrap();
    timeout(Duration::from_secs(5), client.next())
        .await
        .expect("Response timeout")
        .expect("Connection closed")
        .unwrap()
}

#[tokio::test]
async fn test_calculation_over_tcp() {
    let server = TestServer::start(local_config()).await;
    let mut client = connect(server.addr).await;

    assert_eq!(request(&mut client, "WRITE first 12").await, "OK 2");
    assert_eq!(request(&mut client, "WRITE second 30").await, "OK 2");
    assert_eq!(request(&mut client, "WRITE sign +").await, "OK 1");
    assert_eq!(request(&mut client, "READ result").await, "DATA 42\\n");
    assert_eq!(request(&mut client, "READ result").await, "EMPTY spent");

    server.stop().await;
}

#[tokio::test]
async fn test_state_shared_between_clients() {
    let server = TestServer::start(local_config()).await;
    let mut writer = connect(server.addr).await;
    let mut reader = connect(server.addr).await;

    request(&mut writer, "WRITE first 7").await;
    request(&mut writer, "WRITE second 0").await;
    request(&mut writer, "WRITE sign /").await;

    assert_eq!(request(&mut reader, "READ result").await, "DATA Infinity\\n");
    assert_eq!(request(&mut writer, "READ result").await, "EMPTY spent");

    assert_eq!(request(&mut writer, "RESET").await, "OK reset");
    request(&mut writer, "WRITE first 9").await;
    request(&mut writer, "WRITE second 0").await;
    request(&mut writer, "WRITE sign /").await;
    assert_eq!(request(&mut reader, "READ result 3").await, "DATA Inf");

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_request_keeps_connection() {
    let server = TestServer::start(local_config()).await;
    let mut client = connect(server.addr).await;

    let response = request(&mut client, "PUSH 1").await;
    assert!(response.starts_with("ERR request"), "got {response}");

    assert_eq!(request(&mut client, "WRITE result 1").await, "UNSUPPORTED");
    assert_eq!(request(&mut client, "READ first").await, "EMPTY unsupported");
    assert_eq!(request(&mut client, "WRITE first 1").await, "OK 1");

    server.stop().await;
}

#[tokio::test]
async fn test_non_utf8_line_keeps_connection() {
    let server = TestServer::start(local_config()).await;
    let mut client = connect(server.addr).await;

    client
        .get_mut()
        .write_all(b"WRITE first 1\xff\nWRITE first 2\n")
        .await
        .unwrap();
    assert_eq!(next_line(&mut client).await, "OK 2");
    assert_eq!(next_line(&mut client).await, "OK 1");

    client.get_mut().write_all(b"RE\xffAD result\n").await.unwrap();
    let response = next_line(&mut client).await;
    assert!(response.starts_with("ERR request"), "got {response}");

    request(&mut client, "WRITE second 3").await;
    request(&mut client, "WRITE sign +").await;
    assert_eq!(request(&mut client, "READ result").await, "DATA 5\\n");

    server.stop().await;
}

#[tokio::test]
async fn test_rejected_computation() {
    let server = TestServer::start(local_config()).await;
    let mut client = connect(server.addr).await;

    request(&mut client, "WRITE first 1").await;
    request(&mut client, "WRITE second x").await;
    request(&mut client, "WRITE sign +").await;

    let response = request(&mut client, "READ result").await;
    assert!(response.starts_with("ERR malformed_operand"), "got {response}");

    // Gate stays armed after a rejection
    request(&mut client, "WRITE second 2").await;
    assert_eq!(request(&mut client, "READ result").await, "DATA 3\\n");

    server.stop().await;
}

#[tokio::test]
async fn test_state_request() {
    let server = TestServer::start(local_config()).await;
    let mut client = connect(server.addr).await;

    request(&mut client, "WRITE sign *").await;
    let response = request(&mut client, "STATE").await;
    let json = response.strip_prefix("STATE ").unwrap();
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(value["sign"], "*");
    assert_eq!(value["gate"], "armed");

    server.stop().await;
}

#[tokio::test]
async fn test_line_too_long_closes_connection() {
    let server = TestServer::start(ServerConfig {
        max_line_length: 16,
        ..local_config()
    })
    .await;
    let mut client = connect(server.addr).await;

    let response = request(&mut client, &format!("WRITE first {}", "9".repeat(64))).await;
    assert!(response.starts_with("ERR request"), "got {response}");

    let next = timeout(Duration::from_secs(5), client.next())
        .await
        .expect("Close timeout");
    assert!(next.is_none() || next.is_some_and(|r| r.is_err()));

    server.stop().await;
}

#[tokio::test]
async fn test_max_connections_rejects_extra_client() {
    let server = TestServer::start(ServerConfig {
        max_connections: 1,
        ..local_config()
    })
    .await;

    let mut first = connect(server.addr).await;
    assert_eq!(request(&mut first, "WRITE first 1").await, "OK 1");

    let mut second = connect(server.addr).await;
    second.send("STATE".to_string()).await.ok();
    let next = timeout(Duration::from_secs(5), second.next())
        .await
        .expect("Rejection timeout");
    assert!(next.is_none() || next.is_some_and(|r| r.is_err()));

    // The accepted client is unaffected
    assert_eq!(request(&mut first, "WRITE second 2").await, "OK 1");

    server.stop().await;
}
