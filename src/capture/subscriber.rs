//! Live viewer identity and subscription handle.
//!
//! # Responsibilities
//! - Generate unique subscriber IDs for registry keys and tracing
//! - Hand each viewer its own bounded outbound queue
//! - Unregister from the hub when the subscription is dropped

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::capture::hub::CaptureHub;

/// Relaxed ordering is enough: IDs only need to be unique.
static SUBSCRIBER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a live viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        Self(SUBSCRIBER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Encoded snapshot shared by every queue it is pushed to.
pub type Payload = Arc<str>;

/// A registered viewer's end of its outbound queue.
///
/// Dropping the subscription unregisters it, so a writer task that is
/// aborted or panics still leaves the registry clean.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<Payload>,
    hub: CaptureHub,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, rx: mpsc::Receiver<Payload>, hub: CaptureHub) -> Self {
        Self { id, rx, hub }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next snapshot for this viewer, or `None` once it has been evicted.
    pub async fn recv(&mut self) -> Option<Payload> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`Subscription::recv`].
    pub fn try_recv(&mut self) -> Option<Payload> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
