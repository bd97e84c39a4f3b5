//! Capture subsystem: the bounded request history and its live viewers.
//!
//! # Data Flow
//! ```text
//! inbound request (capture mount)
//!     → request.rs (freeze into CapturedRequest)
//!     → hub.rs (append to buffer.rs, broadcast under one lock)
//!     → subscriber.rs (per-viewer bounded queue)
//!     → websocket writer task
//! ```
//!
//! # Design Decisions
//! - One owning component (`CaptureHub`) instead of ambient globals
//! - Buffer and registry share a single coarse lock; both are small
//! - Fan-out is message passing, never direct socket writes under the lock

pub mod buffer;
pub mod hub;
pub mod request;
pub mod subscriber;

pub use buffer::RequestBuffer;
pub use hub::CaptureHub;
pub use request::CapturedRequest;
pub use subscriber::{Payload, SubscriberId, Subscription};
