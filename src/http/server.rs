//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the viewer, live and capture handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve plaintext or TLS on a bound listener
//! - Stop accepting on shutdown signal

use axum::{
    http::HeaderName,
    routing::{any, get},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::capture::CaptureHub;
use crate::config::{loader::ConfigError, validation::normalize_mount, ServerConfig};
use crate::http::handlers::{capture, clear_logs, not_found};
use crate::http::live::live_channel;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::http::view::{show_logs, LogTemplate, TemplateError};
use crate::lifecycle::shutdown;
use crate::net::{load_tls_config, ListenerError, TlsError};

/// How long in-flight HTTP requests get to finish after a TLS shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// Fatal startup or serve error.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("listener error: {0}")]
    Listener(#[from] ListenerError),
    #[error("TLS error: {0}")]
    Tls(#[from] TlsError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub hub: CaptureHub,
    pub template: Arc<LogTemplate>,
    pub max_body_size: usize,
    pub push_timeout: Duration,
}

/// HTTP server for the capture bin.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    hub: CaptureHub,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the embedded page template does not parse.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let template = Arc::new(LogTemplate::embedded()?);
        let hub = CaptureHub::new(config.capture.max_requests, config.live.queue_depth);

        let state = AppState {
            hub: hub.clone(),
            template,
            max_body_size: config.capture.max_body_size,
            push_timeout: Duration::from_millis(config.live.push_timeout_ms),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config, hub })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mount = normalize_mount(&config.capture.mount);

        Router::new()
            .route("/logs", get(show_logs))
            .route("/logs/ws", get(live_channel))
            .route("/logs/clear", any(clear_logs))
            .route(&format!("{mount}/"), any(capture))
            .route(&format!("{mount}/{{*path}}"), any(capture))
            .fallback(not_found)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID)))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(
                HeaderName::from_static(X_REQUEST_ID),
                UuidRequestId,
            ))
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The capture hub shared with the handlers.
    pub fn hub(&self) -> CaptureHub {
        self.hub.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// TLS is used when the config carries both certificate and key.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let app = self.router.into_make_service();

        match &self.config.listener.tls {
            None => {
                tracing::info!(address = %addr, "HTTP server starting");
                axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown::wait(shutdown))
                    .await?;
            }
            Some(tls) => {
                let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
                tracing::info!(address = %addr, cert = %tls.cert_path, "HTTPS server starting");

                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                tokio::spawn(async move {
                    shutdown::wait(shutdown).await;
                    drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn server(max_requests: usize) -> HttpServer {
        let mut config = ServerConfig::default();
        config.capture.max_requests = max_requests;
        HttpServer::new(config).unwrap()
    }

    async fn send(server: &HttpServer, request: Request<Body>) -> (StatusCode, String) {
        let response = server.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-test", "1")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn capture_records_line_headers_and_body() {
        let server = server(10);
        let (status, body) = send(&server, post("/bin/foo", "hello")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Request logged");

        let snapshot = server.hub().snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].request_line.contains("POST /bin/foo"));
        assert!(snapshot[0].headers.contains("X-Test: 1"));
        assert_eq!(snapshot[0].body, "hello");
    }

    #[tokio::test]
    async fn capture_accepts_any_method_and_mount_root() {
        let server = server(10);
        for method in ["GET", "PUT", "DELETE", "PATCH", "OPTIONS"] {
            let request = Request::builder()
                .method(method)
                .uri("/bin/")
                .body(Body::empty())
                .unwrap();
            let (status, _) = send(&server, request).await;
            assert_eq!(status, StatusCode::OK, "{method}");
        }
        assert_eq!(server.hub().len(), 5);
    }

    #[tokio::test]
    async fn clear_rejects_get_and_keeps_buffer() {
        let server = server(10);
        send(&server, post("/bin/a", "a")).await;

        let (status, _) = send(&server, get("/logs/clear")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(server.hub().len(), 1);

        let (status, body) = send(&server, post("/logs/clear", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert!(server.hub().is_empty());
    }

    #[tokio::test]
    async fn logs_page_renders_snapshot() {
        let server = server(10);
        send(&server, post("/bin/page", "<b>hi</b>")).await;

        let (status, page) = send(&server, get("/logs")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("POST /bin/page HTTP/1.1"));
        assert!(page.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert_eq!(server.hub().len(), 1);
    }

    #[tokio::test]
    async fn unknown_paths_are_not_captured() {
        let server = server(10);
        for uri in ["/", "/other", "/bin", "/logs/nope"] {
            let (status, _) = send(&server, get(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }
        assert!(server.hub().is_empty());
    }

    #[tokio::test]
    async fn live_channel_without_upgrade_is_rejected() {
        let server = server(10);
        let (status, _) = send(&server, get("/logs/ws")).await;
        assert!(status.is_client_error());
        assert_eq!(server.hub().subscriber_count(), 0);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let server = server(10);
        let response = server.router().oneshot(post("/bin/id", "")).await.unwrap();
        let id = response.headers().get(X_REQUEST_ID).unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn custom_mount_captures() {
        let mut config = ServerConfig::default();
        config.capture.mount = "/hooks/".into();
        let server = HttpServer::new(config).unwrap();

        let (status, _) = send(&server, post("/hooks/github", "{}")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&server, post("/bin/x", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(server.hub().len(), 1);
    }
}
