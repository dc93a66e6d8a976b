//! Pending request table.
//!
//! Maps request ids to callers waiting for the host's answer. Removing an
//! entry from the map is what settles it: whichever of response, timeout or
//! cancellation removes the entry first wins, and every later attempt finds
//! nothing and does nothing.
//!
//! Flow:
//! 1. Dispatcher allocates a [`RequestId`]
//! 2. Dispatcher calls `register()` to get a [`PendingReply`]
//! 3. Dispatcher posts the request envelope
//! 4. The inbound router calls `complete()` for the matching response,
//!    or the per-request timer calls `expire()`
//! 5. The caller awaits the reply

use crate::domain::error::BridgeError;
use dashmap::DashMap;
use serde_json::Value;
use shared_protocol::{RemoteError, RequestId};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// Final outcome delivered to a waiting caller.
pub type Settlement = Result<Option<Value>, BridgeError>;

/// A request waiting for its response
struct PendingRequest {
    /// Completion handle
    sender: oneshot::Sender<Settlement>,
    /// When the request was registered
    created_at: Instant,
    /// Action name (for logging)
    action: String,
    /// Timeout task, if the request has one
    timer: Option<AbortHandle>,
}

impl PendingRequest {
    fn disarm(&self) {
        if let Some(timer) = &self.timer {
            timer.abort();
        }
    }
}

/// Statistics for the pending request table
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Total requests registered
    pub total_registered: AtomicU64,
    /// Requests resolved with a value
    pub total_completed: AtomicU64,
    /// Requests rejected by an error response
    pub total_failed: AtomicU64,
    /// Requests rejected by their timer
    pub total_timeouts: AtomicU64,
    /// Requests removed without an answer, or whose caller had gone away
    pub total_cancelled: AtomicU64,
    /// Timers started
    pub timers_scheduled: AtomicU64,
}

/// Point-in-time copy of [`PendingStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingStatsSnapshot {
    pub registered: u64,
    pub completed: u64,
    pub failed: u64,
    pub timeouts: u64,
    pub cancelled: u64,
    pub timers_scheduled: u64,
}

impl PendingStats {
    pub fn snapshot(&self) -> PendingStatsSnapshot {
        PendingStatsSnapshot {
            registered: self.total_registered.load(Ordering::Relaxed),
            completed: self.total_completed.load(Ordering::Relaxed),
            failed: self.total_failed.load(Ordering::Relaxed),
            timeouts: self.total_timeouts.load(Ordering::Relaxed),
            cancelled: self.total_cancelled.load(Ordering::Relaxed),
            timers_scheduled: self.timers_scheduled.load(Ordering::Relaxed),
        }
    }
}

/// Table of in-flight requests for one channel.
///
/// Must be used from within a tokio runtime: registering with a non-zero
/// timeout spawns the timer task.
#[derive(Default)]
pub struct PendingRequestTable {
    pending: DashMap<RequestId, PendingRequest>,
    stats: PendingStats,
}

impl PendingRequestTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending request and get the reply handle.
    ///
    /// A zero `timeout` schedules no timer; the entry then waits for a
    /// response indefinitely.
    pub fn register(
        self: &Arc<Self>,
        request_id: RequestId,
        action: &str,
        timeout: Duration,
    ) -> PendingReply {
        let (tx, rx) = oneshot::channel();

        let request = PendingRequest {
            sender: tx,
            created_at: Instant::now(),
            action: action.to_string(),
            timer: None,
        };

        if let Some(previous) = self.pending.insert(request_id, request) {
            previous.disarm();
            warn!(
                request_id = %request_id,
                action = %previous.action,
                "Request id reused while pending, dropping earlier request"
            );
        }
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

        // Armed after insertion so an early expiry always finds the entry.
        if !timeout.is_zero() {
            let timer = self.spawn_timer(request_id, timeout);
            self.stats.timers_scheduled.fetch_add(1, Ordering::Relaxed);
            match self.pending.get_mut(&request_id) {
                Some(mut entry) => entry.timer = Some(timer),
                None => timer.abort(),
            }
        }

        debug!(
            request_id = %request_id,
            action = action,
            timeout_ms = timeout.as_millis(),
            "Registered pending request"
        );

        PendingReply {
            request_id,
            receiver: rx,
        }
    }

    fn spawn_timer(self: &Arc<Self>, request_id: RequestId, timeout: Duration) -> AbortHandle {
        let table = Arc::downgrade(self);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(table) = table.upgrade() {
                table.expire(request_id, timeout);
            }
        })
        .abort_handle()
    }

    /// Settle a pending request with the host's answer.
    ///
    /// Returns true if an entry was found and removed, false if the id is
    /// unknown or already settled.
    pub fn complete(
        &self,
        request_id: RequestId,
        result: Result<Option<Value>, RemoteError>,
    ) -> bool {
        let Some((_, pending)) = self.pending.remove(&request_id) else {
            debug!(
                request_id = %request_id,
                "Response for unknown or settled request"
            );
            return false;
        };
        pending.disarm();

        let response_time = pending.created_at.elapsed();
        let counter = match &result {
            Ok(_) => &self.stats.total_completed,
            Err(_) => &self.stats.total_failed,
        };

        match pending.sender.send(result.map_err(BridgeError::Remote)) {
            Ok(()) => {
                counter.fetch_add(1, Ordering::Relaxed);
                debug!(
                    request_id = %request_id,
                    action = %pending.action,
                    response_time_ms = response_time.as_millis(),
                    "Completed pending request"
                );
            }
            Err(_) => {
                self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
                debug!(
                    request_id = %request_id,
                    action = %pending.action,
                    "Pending request receiver dropped"
                );
            }
        }
        true
    }

    /// Reject a request whose timer ran out.
    ///
    /// Returns false if it was settled first.
    pub fn expire(&self, request_id: RequestId, after: Duration) -> bool {
        let Some((_, pending)) = self.pending.remove(&request_id) else {
            return false;
        };

        self.stats.total_timeouts.fetch_add(1, Ordering::Relaxed);
        warn!(
            request_id = %request_id,
            action = %pending.action,
            timeout_ms = after.as_millis(),
            "Pending request timed out"
        );

        let _ = pending
            .sender
            .send(Err(BridgeError::Timeout { request_id, after }));
        true
    }

    /// Remove a request without answering it.
    ///
    /// The caller's reply, if still held, resolves to
    /// [`BridgeError::ChannelClosed`].
    pub fn cancel(&self, request_id: &RequestId) -> bool {
        if let Some((_, pending)) = self.pending.remove(request_id) {
            pending.disarm();
            self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            debug!(
                request_id = %request_id,
                action = %pending.action,
                "Cancelled pending request"
            );
            true
        } else {
            false
        }
    }

    /// Fail every pending request with [`BridgeError::ChannelClosed`].
    ///
    /// Returns the number of requests removed.
    pub fn close(&self) -> usize {
        let ids: Vec<RequestId> = self.pending.iter().map(|entry| *entry.key()).collect();
        let mut removed = 0;

        for id in ids {
            if let Some((_, pending)) = self.pending.remove(&id) {
                pending.disarm();
                self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
                let _ = pending.sender.send(Err(BridgeError::ChannelClosed));
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed = removed, "Closed pending requests");
        }
        removed
    }

    /// Get number of currently pending requests
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if a request id is pending
    pub fn is_pending(&self, request_id: &RequestId) -> bool {
        self.pending.contains_key(request_id)
    }

    /// Check if a pending request has a live timer
    pub fn has_timer(&self, request_id: &RequestId) -> bool {
        self.pending
            .get(request_id)
            .is_some_and(|entry| entry.timer.is_some())
    }

    /// Get statistics
    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}

/// Handle to the eventual outcome of one request.
///
/// Dropping it does not remove the table entry; the entry still settles
/// (and the outcome is discarded) or times out.
#[must_use = "a pending reply does nothing unless awaited"]
#[derive(Debug)]
pub struct PendingReply {
    request_id: RequestId,
    receiver: oneshot::Receiver<Settlement>,
}

impl PendingReply {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }
}

impl Future for PendingReply {
    type Output = Settlement;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(BridgeError::ChannelClosed)))
    }
}
