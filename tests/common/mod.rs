//! Shared utilities for integration tests.

#![allow(dead_code)]

use futures_util::StreamExt;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use request_bin::config::ServerConfig;
use request_bin::http::HttpServer;
use request_bin::lifecycle::Shutdown;
use request_bin::{net, CaptureHub};

pub type Viewer = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A server running on an ephemeral port. Shuts down on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    pub hub: CaptureHub,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/logs/ws", self.addr)
    }

    /// Wait until the hub reports `count` live viewers.
    pub async fn wait_for_subscribers(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.hub.subscriber_count() != count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("expected {count} subscribers, have {}", self.hub.subscriber_count()));
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a plaintext server keeping at most `max_requests` captures.
pub async fn start_server(max_requests: usize) -> TestServer {
    let mut config = ServerConfig::default();
    config.capture.max_requests = max_requests;
    start_server_with(config).await
}

/// Start a server from `config`, bound to an ephemeral loopback port.
pub async fn start_server_with(mut config: ServerConfig) -> TestServer {
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;

    let server = HttpServer::new(config).unwrap();
    let hub = server.hub();
    let listener = net::bind(&server.config().listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, hub, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// POST `body` to `path` and return the status code.
pub async fn post(server: &TestServer, path: &str, body: &str) -> u16 {
    client()
        .post(server.url(path))
        .body(body.to_string())
        .send()
        .await
        .expect("server unreachable")
        .status()
        .as_u16()
}

pub async fn connect_viewer(server: &TestServer) -> Viewer {
    let (ws, _) = connect_async(server.ws_url()).await.expect("upgrade failed");
    ws
}

/// Next pushed snapshot, as the list of captured bodies.
pub async fn next_bodies(viewer: &mut Viewer) -> Vec<String> {
    next_snapshot(viewer)
        .await
        .into_iter()
        .map(|entry| entry["body"].as_str().unwrap_or_default().to_string())
        .collect()
}

pub async fn next_snapshot(viewer: &mut Viewer) -> Vec<serde_json::Value> {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), viewer.next())
            .await
            .expect("timed out waiting for snapshot")
            .expect("viewer stream ended")
            .expect("websocket error");

        if let Message::Text(text) = frame {
            let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
            return value.as_array().expect("snapshot is an array").clone();
        }
    }
}
