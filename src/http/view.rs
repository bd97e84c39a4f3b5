//! Snapshot page for non-live viewing.
//!
//! # Responsibilities
//! - Parse the embedded HTML template once at startup
//! - Render the current buffer into it with HTML escaping
//! - Serve `GET /logs` (200 HTML, 500 on render failure)
//!
//! # Design Decisions
//! - Slots are `{{name}}`; an unknown slot or a template without
//!   `{{requests}}` is a startup error, not a per-request one
//! - Rendering never mutates state and never triggers a broadcast

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::fmt::Write;
use thiserror::Error;

use crate::capture::CapturedRequest;
use crate::http::server::AppState;

/// Template shipped with the binary.
pub const LOGS_TEMPLATE: &str = include_str!("template.html");

/// Error type for template parsing and rendering.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template has no {{{{requests}}}} slot")]
    MissingRequestsSlot,
    #[error("unknown template slot {{{{{0}}}}}")]
    UnknownSlot(String),
    #[error("unterminated slot at byte {0}")]
    Unterminated(usize),
    #[error("failed to render template: {0}")]
    Render(#[from] std::fmt::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Requests,
    Count,
    Capacity,
}

/// A parsed page template.
#[derive(Debug, Clone)]
pub struct LogTemplate {
    segments: Vec<Segment>,
}

impl LogTemplate {
    /// Parse the embedded template.
    pub fn embedded() -> Result<Self, TemplateError> {
        Self::parse(LOGS_TEMPLATE)
    }

    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or(TemplateError::Unterminated(offset + start))?;
            let segment = match after[..end].trim() {
                "requests" => Segment::Requests,
                "count" => Segment::Count,
                "capacity" => Segment::Capacity,
                other => return Err(TemplateError::UnknownSlot(other.to_string())),
            };
            segments.push(segment);

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        if !segments.contains(&Segment::Requests) {
            return Err(TemplateError::MissingRequestsSlot);
        }
        Ok(Self { segments })
    }

    /// Render `requests` (oldest first) into the page.
    pub fn render(&self, requests: &[CapturedRequest], capacity: usize) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(8 * 1024);
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Count => write!(out, "{}", requests.len())?,
                Segment::Capacity => write!(out, "{}", capacity)?,
                Segment::Requests => render_requests(&mut out, requests)?,
            }
        }
        Ok(out)
    }
}

fn render_requests(out: &mut String, requests: &[CapturedRequest]) -> std::fmt::Result {
    if requests.is_empty() {
        return writeln!(out, r#"<p class="empty">No requests captured yet.</p>"#);
    }
    for request in requests {
        writeln!(out, r#"<div class="request">"#)?;
        writeln!(out, r#"  <div class="request-line">{}</div>"#, escape(&request.request_line))?;
        writeln!(out, r#"  <div class="received">{}</div>"#, request.received_at.to_rfc3339())?;
        writeln!(out, r#"  <pre class="headers">{}</pre>"#, escape(&request.headers))?;
        if !request.body.is_empty() {
            writeln!(out, r#"  <pre class="body">{}</pre>"#, escape(&request.body))?;
        }
        writeln!(out, "</div>")?;
    }
    Ok(())
}

/// Minimal HTML escaping for text and attribute content.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `GET /logs`
pub async fn show_logs(State(state): State<AppState>) -> Response {
    let requests = state.hub.snapshot();
    match state.template.render(&requests, state.hub.capacity()) {
        Ok(page) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, "no-store")],
            Html(page),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render logs page");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
