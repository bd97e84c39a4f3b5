//! Bounded FIFO store of captured requests.

use std::collections::VecDeque;

use serde::{Serialize, Serializer};

use crate::capture::request::CapturedRequest;

/// Fixed-capacity ring of captures, oldest first.
///
/// `len() <= capacity()` holds after every mutation. A capacity of zero keeps
/// nothing at all.
#[derive(Debug, Clone)]
pub struct RequestBuffer {
    entries: VecDeque<CapturedRequest>,
    capacity: usize,
}

impl RequestBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `request`, evicting the single oldest entry when full.
    pub fn append(&mut self, request: CapturedRequest) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(request);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Point-in-time copy in arrival order.
    pub fn snapshot(&self) -> Vec<CapturedRequest> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// Serializes as the ordered JSON array pushed to viewers.
impl Serialize for RequestBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}
