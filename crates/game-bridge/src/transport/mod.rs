//! Message channel abstraction.
//!
//! The bridge only needs two things from the embedding environment: a way
//! to post a JSON value to the other side, and a stream of JSON values
//! arriving from it. Delivery is fire-and-forget; nothing here correlates.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub mod memory;

/// Outbound half of a message channel
#[async_trait]
pub trait MessagePort: Send + Sync {
    /// Post one message to the other side
    async fn post_message(&self, message: Value) -> Result<(), TransportError>;
}

/// Inbound half of a message channel
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Receive the next message (waits until one is available)
    async fn next_message(&self) -> Result<Value, TransportError>;
}

/// Transport error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The other side has gone away. Listeners stop on this.
    #[error("channel closed")]
    Closed,
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Consecutive receive failures tolerated before a loop gives up.
pub const MAX_RECEIVE_FAILURES: u32 = 8;

/// Delay after the first receive failure (doubles each time).
const RECEIVE_BASE_DELAY: Duration = Duration::from_millis(10);

/// Maximum delay between receive attempts.
const RECEIVE_MAX_DELAY: Duration = Duration::from_secs(1);

/// Exponential backoff for receive loops over a failing [`MessageSource`].
#[derive(Debug, Default)]
pub struct ReceiveBackoff {
    failures: u32,
}

impl ReceiveBackoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. Returns how long to wait before the next attempt,
    /// or `None` once [`MAX_RECEIVE_FAILURES`] is reached.
    pub fn next_delay(&mut self) -> Option<Duration> {
        self.failures += 1;
        if self.failures >= MAX_RECEIVE_FAILURES {
            return None;
        }
        let delay = RECEIVE_BASE_DELAY.saturating_mul(1 << (self.failures - 1).min(10));
        Some(delay.min(RECEIVE_MAX_DELAY))
    }

    /// Clear the failure count after a successful receive.
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}
