//! Captured request snapshot.
//!
//! # Responsibilities
//! - Freeze one inbound request into an owned, immutable record
//! - Format the request line as `METHOD PATH VERSION`
//! - Flatten headers into one `Name: value` line per value
//!
//! # Design Decisions
//! - Header names are rendered in canonical Title-Case (`x-test` → `X-Test`)
//! - Bodies are decoded lossily; invalid UTF-8 never rejects a capture
//! - Field order is fixed so the JSON encoding is deterministic

use axum::http::{request::Parts, HeaderMap, HeaderName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One captured inbound HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedRequest {
    /// `METHOD PATH VERSION`, e.g. `POST /bin/foo HTTP/1.1`.
    pub request_line: String,
    /// Newline-terminated `Name: value` lines.
    pub headers: String,
    /// Body decoded as text. May be empty.
    pub body: String,
    /// When the request was captured.
    pub received_at: DateTime<Utc>,
}

impl CapturedRequest {
    /// Build a capture from request parts and the (possibly empty) body bytes.
    pub fn from_parts(parts: &Parts, body: &[u8]) -> Self {
        Self {
            request_line: format!("{} {} {:?}", parts.method, parts.uri.path(), parts.version),
            headers: flatten_headers(&parts.headers),
            body: String::from_utf8_lossy(body).into_owned(),
            received_at: Utc::now(),
        }
    }
}

/// Render every (name, value) pair as its own line.
pub fn flatten_headers(headers: &HeaderMap) -> String {
    let mut out = String::new();
    for (name, value) in headers.iter() {
        out.push_str(&canonical_name(name));
        out.push_str(": ");
        out.push_str(&String::from_utf8_lossy(value.as_bytes()));
        out.push('\n');
    }
    out
}

/// `content-type` → `Content-Type`.
fn canonical_name(name: &HeaderName) -> String {
    name.as_str()
        .split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
