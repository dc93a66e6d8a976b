//! Inbound side: match arriving messages to pending requests.

use crate::domain::PendingRequestTable;
use crate::transport::{MessageSource, ReceiveBackoff, TransportError};
use serde_json::Value;
use shared_protocol::{CodecError, RequestId, ResponseEnvelope};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// A pending request was settled with it.
    Settled(RequestId),
    /// Well-formed response, but nothing is waiting for that id.
    Unmatched(RequestId),
    /// Not a response of ours.
    Ignored(CodecError),
}

/// Routes inbound responses into the pending request table.
///
/// Never fails: the channel is shared with unrelated traffic, and anything
/// that is not a usable response is dropped.
#[derive(Clone)]
pub struct InboundRouter {
    pending: Arc<PendingRequestTable>,
}

impl InboundRouter {
    pub fn new(pending: Arc<PendingRequestTable>) -> Self {
        Self { pending }
    }

    pub fn route(&self, message: &Value) -> RouteOutcome {
        let response = match ResponseEnvelope::from_message(message) {
            Ok(response) => response,
            Err(reason @ CodecError::InvalidRequestId(_)) => {
                warn!(reason = %reason, "Protocol violation in inbound message, ignoring");
                return RouteOutcome::Ignored(reason);
            }
            Err(reason) => {
                debug!(reason = %reason, "Ignoring inbound message");
                return RouteOutcome::Ignored(reason);
            }
        };

        let request_id = response.request_id;
        if self.pending.complete(request_id, response.body.into_result()) {
            RouteOutcome::Settled(request_id)
        } else {
            RouteOutcome::Unmatched(request_id)
        }
    }
}

/// Drives an [`InboundRouter`] from a [`MessageSource`].
pub struct ResponseListener {
    router: InboundRouter,
    source: Arc<dyn MessageSource>,
}

impl ResponseListener {
    pub fn new(router: InboundRouter, source: Arc<dyn MessageSource>) -> Self {
        Self { router, source }
    }

    /// Run the listener loop until the source closes or keeps failing.
    pub async fn run(self) {
        let mut backoff = ReceiveBackoff::new();
        loop {
            match self.source.next_message().await {
                Ok(message) => {
                    backoff.reset();
                    self.router.route(&message);
                }
                Err(TransportError::Closed) => {
                    debug!("Message source closed, stopping listener");
                    break;
                }
                Err(e) => match backoff.next_delay() {
                    Some(delay) => {
                        warn!(error = %e, retry_in = ?delay, "Error receiving inbound message");
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        error!(
                            error = %e,
                            failures = backoff.failures(),
                            "Inbound source keeps failing, stopping listener"
                        );
                        break;
                    }
                },
            }
        }
    }
}
