//! Outbound side: turn a call into a request envelope and a pending reply.

use crate::domain::{
    BridgeConfig, BridgeError, BridgeResult, PendingReply, PendingRequestTable, RequestIdAllocator,
};
use crate::transport::MessagePort;
use serde_json::Value;
use shared_protocol::RequestEnvelope;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Issues requests and registers them for correlation.
pub struct Dispatcher {
    /// Pending request table shared with the inbound router
    pending: Arc<PendingRequestTable>,
    /// Outbound channel
    port: Arc<dyn MessagePort>,
    ids: RequestIdAllocator,
    protocol_tag: String,
    default_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        pending: Arc<PendingRequestTable>,
        port: Arc<dyn MessagePort>,
        config: &BridgeConfig,
    ) -> Self {
        Self {
            pending,
            port,
            ids: RequestIdAllocator::new(),
            protocol_tag: config.protocol_tag.clone(),
            default_timeout: config.default_timeout,
        }
    }

    /// Send a request and wait for its answer, using the default timeout.
    pub async fn dispatch(&self, action: &str, data: Option<Value>) -> BridgeResult<Option<Value>> {
        self.dispatch_with_timeout(action, data, self.default_timeout)
            .await
    }

    /// Send a request and wait for its answer.
    ///
    /// `Duration::ZERO` waits indefinitely.
    pub async fn dispatch_with_timeout(
        &self,
        action: &str,
        data: Option<Value>,
        timeout: Duration,
    ) -> BridgeResult<Option<Value>> {
        self.send_request(action, data, timeout).await?.await
    }

    /// Post a request and return a handle to its eventual answer.
    ///
    /// The pending entry is registered before the envelope is posted, so a
    /// response can never arrive ahead of its entry. If posting fails the
    /// entry is removed and the transport error returned.
    pub async fn send_request(
        &self,
        action: &str,
        data: Option<Value>,
        timeout: Duration,
    ) -> BridgeResult<PendingReply> {
        if action.is_empty() {
            return Err(BridgeError::InvalidAction);
        }

        let request_id = self.ids.next_id().ok_or(BridgeError::IdsExhausted)?;
        let envelope = RequestEnvelope::new(&self.protocol_tag, request_id, action, data);

        let reply = self.pending.register(request_id, action, timeout);

        if let Err(e) = self.port.post_message(envelope.to_message()).await {
            self.pending.cancel(&request_id);
            warn!(
                request_id = %request_id,
                action = action,
                error = %e,
                "Failed to post request"
            );
            return Err(e.into());
        }

        debug!(request_id = %request_id, action = action, "Sent request");

        Ok(reply)
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Get pending request count
    pub fn pending_count(&self) -> usize {
        self.pending.pending_count()
    }
}
