//! Capture and clear endpoints.
//!
//! # Responsibilities
//! - Capture any method and path under the mount, best effort
//! - Clear the buffer on `POST /logs/clear`
//! - Answer everything else with plain status codes

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::capture::CapturedRequest;
use crate::config::VIEWER_PREFIX;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Acknowledgement body for a captured request.
pub const CAPTURED_ACK: &str = "Request logged";

/// `ANY <mount>/*`: capture the request and broadcast the new snapshot.
pub async fn capture(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();

    if is_viewer_path(parts.uri.path()) {
        tracing::debug!(request_id = %request_id, path = %parts.uri.path(), "Refusing to capture viewer path");
        return StatusCode::NOT_FOUND.into_response();
    }

    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Failed to read request body, capturing it empty"
            );
            Bytes::new()
        }
    };

    let captured = CapturedRequest::from_parts(&parts, &body);
    tracing::debug!(
        request_id = %request_id,
        request_line = %captured.request_line,
        body_len = body.len(),
        "Request captured"
    );

    metrics::record_capture(&parts.method);
    state.hub.record(captured);

    (StatusCode::OK, CAPTURED_ACK).into_response()
}

fn is_viewer_path(path: &str) -> bool {
    path.strip_prefix(VIEWER_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// `POST /logs/clear`: empty the buffer. Other methods get 405.
pub async fn clear_logs(State(state): State<AppState>, method: Method) -> Response {
    if method != Method::POST {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    state.hub.clear();
    metrics::record_clear();
    tracing::info!("Capture buffer cleared");

    StatusCode::OK.into_response()
}

/// Fallback for paths outside the viewer and capture mounts.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
