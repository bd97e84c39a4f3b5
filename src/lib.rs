//! Request Bin: an HTTP capture server.
//!
//! Requests sent anywhere under the capture mount (`/bin/` by default) are
//! frozen into [`capture::CapturedRequest`] records and kept in a bounded
//! FIFO buffer. Live viewers on `/logs/ws` receive the whole buffer as a JSON
//! array when they connect and again after every capture or clear.
//!
//! # Architecture Overview
//!
//! ```text
//!   sender ──ANY /bin/*──▶ handlers::capture ──┐
//!                                              ▼
//!   browser ─POST /logs/clear─▶ clear ──▶ CaptureHub (one lock)
//!                                          ├─ RequestBuffer (FIFO, N)
//!                                          └─ subscribers ──try_send──▶ per-viewer queue
//!                                                                            │
//!   browser ◀──────────────── WebSocket /logs/ws ◀── writer task ◀───────────┘
//!   browser ◀── GET /logs (HTML snapshot)
//! ```

pub mod capture;
pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use capture::{CaptureHub, CapturedRequest};
pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
