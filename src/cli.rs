//! Command-line interface.
//!
//! Flags override values from the optional config file; anything left unset
//! keeps the file value or the built-in default.

use clap::Parser;
use std::path::PathBuf;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{ServerConfig, TlsConfig};

#[derive(Debug, Parser)]
#[command(name = "request-bin")]
#[command(about = "Capture inbound HTTP requests and stream them to live viewers", long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to listen on [default: localhost]
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on [default: 8000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Maximum number of requests to keep in buffer [default: 10]
    #[arg(short, long = "max")]
    pub max_requests: Option<usize>,

    /// Path to TLS certificate file (PEM)
    #[arg(long)]
    pub cert: Option<String>,

    /// Path to TLS private key file (PEM)
    #[arg(long)]
    pub key: Option<String>,

    /// Path prefix that captures requests [default: /bin]
    #[arg(long)]
    pub mount: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    pub metrics_address: Option<String>,
}

impl Cli {
    /// Exactly one of `--cert` and `--key` was given.
    pub fn partial_tls(&self) -> bool {
        self.cert.is_some() != self.key.is_some()
    }

    /// Resolve the effective configuration: file, then flags, then validation.
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let path = self.config.clone();
        load_config(path.as_deref(), |config| self.apply(config))
    }

    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.listener.host = host;
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(max) = self.max_requests {
            config.capture.max_requests = max;
        }
        if let Some(mount) = self.mount {
            config.capture.mount = mount;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(addr) = self.metrics_address {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = addr;
        }

        // TLS only when both halves are given; otherwise plaintext.
        match (self.cert, self.key) {
            (Some(cert_path), Some(key_path)) => {
                config.listener.tls = Some(TlsConfig { cert_path, key_path });
            }
            (Some(_), None) | (None, Some(_)) => config.listener.tls = None,
            (None, None) => {}
        }
    }
}
