//! Request id allocation.
//!
//! Ids come from a pre-incremented counter starting at zero, so the first
//! id is 1 and ids are strictly increasing for the life of the allocator.
//! An id is therefore never reused while an earlier request holding it
//! could still be pending.

use shared_protocol::RequestId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request id source. One per channel.
#[derive(Debug, Default)]
pub struct RequestIdAllocator {
    last: AtomicU64,
}

impl RequestIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id. `None` once the counter is exhausted.
    pub fn next_id(&self) -> Option<RequestId> {
        self.last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
            .ok()
            .and_then(|prev| RequestId::new(prev + 1))
    }

    /// Most recently issued id, if any.
    pub fn last_issued(&self) -> Option<RequestId> {
        RequestId::new(self.last.load(Ordering::Acquire))
    }
}
