//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, plaintext or TLS)
//!     → request.rs (request ID)
//!     → /bin/*       → handlers.rs capture → CaptureHub::record
//!     → /logs/clear  → handlers.rs clear   → CaptureHub::clear
//!     → /logs        → view.rs (template render of the snapshot)
//!     → /logs/ws     → live.rs (subscribe, push snapshots)
//! ```

pub mod handlers;
pub mod live;
pub mod request;
pub mod server;
pub mod view;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
