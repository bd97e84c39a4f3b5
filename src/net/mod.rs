//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig
//!     → listener.rs (resolve host, bind)
//!     → tls.rs (optional: validate PEM files, build rustls config)
//!     → Hand off to HTTP layer (plaintext or TLS acceptor)
//! ```
//!
//! # Design Decisions
//! - Bind errors are fatal and reported before any traffic is served
//! - TLS is optional and chosen only when both cert and key are configured

pub mod listener;
pub mod tls;

pub use listener::{bind, ListenerError};
pub use tls::{load_tls_config, TlsError};
