//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Keep the capture mount disjoint from the viewer namespace
//! - Validate value ranges (queue depth, timeouts, body limit)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// Path prefix reserved for the viewer endpoints.
pub const VIEWER_PREFIX: &str = "/logs";

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("capture.mount must start with '/' (got {0:?})")]
    MountNotAbsolute(String),
    #[error("capture.mount must not be the root path")]
    MountIsRoot,
    #[error("capture.mount {0:?} contains route syntax (segments must not start with ':' or '*' or contain braces)")]
    MountSyntax(String),
    #[error("capture.mount {0:?} overlaps the viewer path /logs")]
    MountOverlapsViewer(String),
    #[error("capture.max_body_size must be at least 1")]
    ZeroBodyLimit,
    #[error("live.queue_depth must be at least 1")]
    ZeroQueueDepth,
    #[error("live.push_timeout_ms must be at least 1")]
    ZeroPushTimeout,
    #[error("timeouts.request_secs must be at least 1")]
    ZeroRequestTimeout,
    #[error("listener.host must not be empty")]
    EmptyHost,
}

/// Check every semantic constraint, collecting all failures.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    let mount = &config.capture.mount;
    if !mount.starts_with('/') {
        errors.push(ValidationError::MountNotAbsolute(mount.clone()));
    } else if mount.trim_end_matches('/').is_empty() {
        errors.push(ValidationError::MountIsRoot);
    } else if has_route_syntax(mount) {
        errors.push(ValidationError::MountSyntax(mount.clone()));
    } else if overlaps_viewer(mount) {
        errors.push(ValidationError::MountOverlapsViewer(mount.clone()));
    }

    if config.capture.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.live.queue_depth == 0 {
        errors.push(ValidationError::ZeroQueueDepth);
    }
    if config.live.push_timeout_ms == 0 {
        errors.push(ValidationError::ZeroPushTimeout);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Normalise a mount to `/segment` form without a trailing slash.
pub fn normalize_mount(mount: &str) -> String {
    format!("/{}", mount.trim_matches('/'))
}

// The router reads these as captures or wildcards and refuses to build.
fn has_route_syntax(mount: &str) -> bool {
    mount.split('/').any(|segment| {
        segment.starts_with(':') || segment.starts_with('*') || segment.contains(['{', '}'])
    })
}

// Either prefix containing the other makes routing ambiguous.
fn overlaps_viewer(mount: &str) -> bool {
    let mount = format!("{}/", normalize_mount(mount));
    let viewer = format!("{}/", VIEWER_PREFIX);
    mount.starts_with(&viewer) || viewer.starts_with(&mount)
}
