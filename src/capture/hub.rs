//! Shared capture state and snapshot fan-out.
//!
//! # Responsibilities
//! - Own the request buffer and the live subscriber registry
//! - Serialize every read, mutation and broadcast behind one lock
//! - Push encoded snapshots onto each subscriber's bounded queue
//! - Evict subscribers whose queue is closed or full
//!
//! # Data Flow
//! ```text
//! ingest / clear
//!     → lock
//!     → buffer.append / buffer.clear
//!     → encode buffer once (JSON array)
//!     → try_send to every subscriber queue (never blocks)
//!     → unlock
//!
//! per-viewer writer task
//!     → queue.recv() → socket.send() (bounded by write timeout)
//! ```
//!
//! # Design Decisions
//! - Mutation and broadcast share one critical section, so every viewer sees
//!   broadcasts in the order they were issued
//! - A new subscriber's first snapshot is queued inside the same critical
//!   section that registers it; no broadcast can overtake it
//! - A full queue means the viewer stopped draining; it is dropped rather
//!   than allowed to stall producers

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::capture::buffer::RequestBuffer;
use crate::capture::request::CapturedRequest;
use crate::capture::subscriber::{Payload, SubscriberId, Subscription};
use crate::observability::metrics;

#[derive(Debug)]
struct HubState {
    buffer: RequestBuffer,
    subscribers: HashMap<SubscriberId, mpsc::Sender<Payload>>,
}

impl HubState {
    fn encode(&self) -> Option<Payload> {
        match serde_json::to_string(&self.buffer) {
            Ok(json) => Some(Arc::from(json)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode snapshot, skipping push");
                None
            }
        }
    }

    /// Push the current buffer to every subscriber.
    fn broadcast(&mut self) {
        let Some(payload) = self.encode() else {
            return;
        };

        let mut evicted = Vec::new();
        for (id, tx) in &self.subscribers {
            match tx.try_send(Arc::clone(&payload)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(subscriber_id = %id, "Subscriber queue full, evicting");
                    evicted.push(*id);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(subscriber_id = %id, "Subscriber channel closed, evicting");
                    evicted.push(*id);
                }
            }
        }

        for id in &evicted {
            self.subscribers.remove(id);
        }

        metrics::record_broadcast(evicted.len());
        metrics::record_state(self.buffer.len(), self.subscribers.len());

        tracing::trace!(
            delivered = self.subscribers.len(),
            evicted = evicted.len(),
            entries = self.buffer.len(),
            "Snapshot broadcast"
        );
    }
}

/// Owner of the capture buffer and its live viewers.
///
/// Cheap to clone; all clones share the same state.
#[derive(Debug, Clone)]
pub struct CaptureHub {
    inner: Arc<Mutex<HubState>>,
    queue_depth: usize,
}

impl CaptureHub {
    /// Create a hub retaining at most `max_requests` captures, with
    /// `queue_depth` pending snapshots allowed per viewer.
    pub fn new(max_requests: usize, queue_depth: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubState {
                buffer: RequestBuffer::new(max_requests),
                subscribers: HashMap::new(),
            })),
            queue_depth: queue_depth.max(1),
        }
    }

    // Every operation leaves the state consistent before it can panic, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a capture and broadcast the new snapshot.
    pub fn record(&self, request: CapturedRequest) {
        let mut state = self.lock();
        state.buffer.append(request);
        state.broadcast();
    }

    /// Empty the buffer and broadcast the (empty) snapshot.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.buffer.clear();
        state.broadcast();
    }

    /// Current captures, oldest first.
    pub fn snapshot(&self) -> Vec<CapturedRequest> {
        self.lock().buffer.snapshot()
    }

    /// Register a new viewer. The current snapshot is already queued on the
    /// returned subscription.
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriberId::new();
        let (tx, rx) = mpsc::channel(self.queue_depth);

        let mut state = self.lock();
        if let Some(payload) = state.encode() {
            // Fresh queue with capacity >= 1; this cannot be full.
            let _ = tx.try_send(payload);
        }
        state.subscribers.insert(id, tx);
        metrics::record_state(state.buffer.len(), state.subscribers.len());
        drop(state);

        tracing::debug!(subscriber_id = %id, "Subscriber registered");
        Subscription::new(id, rx, self.clone())
    }

    /// Remove a viewer. Returns false when it was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut state = self.lock();
        let removed = state.subscribers.remove(&id).is_some();
        if removed {
            metrics::record_state(state.buffer.len(), state.subscribers.len());
            tracing::debug!(subscriber_id = %id, "Subscriber unregistered");
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    pub fn len(&self) -> usize {
        self.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().buffer.capacity()
    }
}
