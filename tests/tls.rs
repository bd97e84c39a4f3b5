//! Encrypted serving with a self-signed localhost certificate.

use std::time::Duration;

mod common;

use common::start_server_with;
use request_bin::config::{ServerConfig, TlsConfig};
use request_bin::http::{HttpServer, ServerError};
use request_bin::lifecycle::Shutdown;
use request_bin::net;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn tls_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.listener.tls = Some(TlsConfig {
        cert_path: fixture("localhost.crt"),
        key_path: fixture("localhost.key"),
    });
    config
}

fn insecure_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .danger_accept_invalid_certs(true)
        .build()
        .unwrap()
}

#[tokio::test]
async fn captures_over_https() {
    let server = start_server_with(tls_config()).await;
    let url = format!("https://{}/bin/secure", server.addr);

    let res = insecure_client().post(url).body("sealed").send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "Request logged");

    let snapshot = server.hub.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].body, "sealed");
}

#[tokio::test]
async fn https_server_stops_on_shutdown() {
    let server = HttpServer::new(tls_config()).unwrap();
    let listener = net::bind(&server.config().listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let running = tokio::spawn(server.run(listener, rx));

    {
        let client = insecure_client();
        let res = client
            .get(format!("https://{addr}/logs"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(15), running)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn missing_certificate_fails_startup() {
    let mut config = tls_config();
    config.listener.tls = Some(TlsConfig {
        cert_path: fixture("absent.crt"),
        key_path: fixture("localhost.key"),
    });

    let server = HttpServer::new(config).unwrap();
    let listener = net::bind(&server.config().listener).await.unwrap();
    let shutdown = Shutdown::new();

    let err = server.run(listener, shutdown.subscribe()).await.unwrap_err();
    assert!(matches!(err, ServerError::Tls(_)));
}
