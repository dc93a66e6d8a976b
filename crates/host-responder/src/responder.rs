//! Request handling for the host side of the channel.

use crate::config::HostConfig;
use crate::error::HostError;
use crate::registry::{ActionRegistry, HandlerResult};
use game_bridge::{MessagePort, MessageSource, ReceiveBackoff, TransportError};
use serde_json::Value;
use shared_protocol::{codes, Action, RemoteError, RequestEnvelope, ResponseEnvelope};
use tracing::{debug, error, warn};

/// Answers game requests from an [`ActionRegistry`].
pub struct HostResponder {
    registry: ActionRegistry,
    protocol_tag: String,
}

impl HostResponder {
    pub fn new(protocol_tag: impl Into<String>, registry: ActionRegistry) -> Self {
        Self {
            registry,
            protocol_tag: protocol_tag.into(),
        }
    }

    /// Build from config, validating it and, if required, the registry.
    pub fn from_config(config: &HostConfig, registry: ActionRegistry) -> Result<Self, HostError> {
        config.validate()?;
        if config.require_all_actions {
            registry.validate(&Action::ALL)?;
        }
        Ok(Self::new(&config.protocol_tag, registry))
    }

    /// Handle one inbound message.
    ///
    /// Returns the response to post, or `None` if the message is not a
    /// request for this protocol. Every accepted request gets exactly one
    /// response.
    pub async fn handle(&self, message: &Value) -> Option<Value> {
        let request = match RequestEnvelope::from_message(message, &self.protocol_tag) {
            Ok(request) => request,
            Err(reason) => {
                debug!(reason = %reason, "Ignoring inbound message");
                return None;
            }
        };

        let result = self.invoke(&request).await;
        if let Err(e) = &result {
            warn!(
                request_id = %request.request_id,
                action = %request.action,
                code = e.code,
                error = %e.message,
                "Request failed"
            );
        } else {
            debug!(
                request_id = %request.request_id,
                action = %request.action,
                "Request handled"
            );
        }

        let response = ResponseEnvelope {
            request_id: request.request_id,
            body: result.into(),
        };
        Some(response.to_message())
    }

    async fn invoke(&self, request: &RequestEnvelope) -> HandlerResult {
        let handler = request
            .action
            .parse::<Action>()
            .ok()
            .and_then(|action| self.registry.get(action))
            .ok_or_else(|| {
                RemoteError::new(
                    codes::SYSTEM_ERROR,
                    format!("missing handler for action {}", request.action),
                )
            })?;

        // A panicking handler still gets an answer.
        let handler = handler.clone();
        let data = request.data.clone();
        tokio::spawn(async move { handler.handle(data).await })
            .await
            .unwrap_or_else(|e| {
                error!(action = %request.action, error = %e, "Handler failed");
                Err(RemoteError::system(format!(
                    "handler for action {} panicked",
                    request.action
                )))
            })
    }

    /// Serve a channel until it closes.
    ///
    /// Receive errors are retried with backoff; the last one is returned
    /// if the source keeps failing.
    pub async fn run(
        &self,
        source: &dyn MessageSource,
        port: &dyn MessagePort,
    ) -> Result<(), TransportError> {
        let mut backoff = ReceiveBackoff::new();
        loop {
            let message = match source.next_message().await {
                Ok(message) => {
                    backoff.reset();
                    message
                }
                Err(TransportError::Closed) => {
                    debug!("Message source closed, stopping responder");
                    return Ok(());
                }
                Err(e) => match backoff.next_delay() {
                    Some(delay) => {
                        warn!(error = %e, retry_in = ?delay, "Error receiving request");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    None => {
                        error!(
                            error = %e,
                            failures = backoff.failures(),
                            "Request source keeps failing"
                        );
                        return Err(e);
                    }
                },
            };

            if let Some(response) = self.handle(&message).await {
                match port.post_message(response).await {
                    Ok(()) => {}
                    Err(TransportError::Closed) => {
                        debug!("Game side closed, stopping responder");
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }
}
