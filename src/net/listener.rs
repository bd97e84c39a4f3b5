//! TCP listener setup.
//!
//! # Responsibilities
//! - Resolve the configured host (names like `localhost` included)
//! - Bind the first address that accepts
//! - Report bind failures as fatal startup errors

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::{lookup_host, TcpListener};

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Host name could not be resolved.
    #[error("Failed to resolve {address}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: std::io::Error,
    },
    /// Resolution produced no usable addresses.
    #[error("No addresses found for {0}")]
    NoAddress(String),
    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bind a listener on the configured host and port.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let address = config.address();
    let candidates: Vec<SocketAddr> = lookup_host((config.host.as_str(), config.port))
        .await
        .map_err(|source| ListenerError::Resolve {
            address: address.clone(),
            source,
        })?
        .collect();

    let mut last_error = None;
    for candidate in candidates {
        match TcpListener::bind(candidate).await {
            Ok(listener) => {
                tracing::info!(address = %candidate, "Listener bound");
                return Ok(listener);
            }
            Err(e) => {
                tracing::debug!(address = %candidate, error = %e, "Bind attempt failed");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(source) => Err(ListenerError::Bind { address, source }),
        None => Err(ListenerError::NoAddress(address)),
    }
}
