//! Explicit action → handler table.
//!
//! Every action the host serves is registered by its catalog entry. A host
//! can check at startup that nothing it is expected to serve is missing.

use crate::error::HostError;
use async_trait::async_trait;
use serde_json::Value;
use shared_protocol::{Action, RemoteError};
use std::collections::HashMap;
use std::sync::Arc;

/// What a handler produces: an optional value, or an error to report.
pub type HandlerResult = Result<Option<Value>, RemoteError>;

/// Serves one action.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, data: Option<Value>) -> HandlerResult;
}

/// Adapter for synchronous closures.
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> ActionHandler for FnHandler<F>
where
    F: Fn(Option<Value>) -> HandlerResult + Send + Sync,
{
    async fn handle(&self, data: Option<Value>) -> HandlerResult {
        (self.0)(data)
    }
}

/// Handlers keyed by action.
#[derive(Default, Clone)]
pub struct ActionRegistry {
    handlers: HashMap<Action, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any earlier one for the same action.
    pub fn register(&mut self, action: Action, handler: Arc<dyn ActionHandler>) -> &mut Self {
        self.handlers.insert(action, handler);
        self
    }

    /// Register a synchronous closure.
    pub fn register_fn<F>(&mut self, action: Action, handler: F) -> &mut Self
    where
        F: Fn(Option<Value>) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(action, Arc::new(FnHandler(handler)))
    }

    pub fn get(&self, action: Action) -> Option<&Arc<dyn ActionHandler>> {
        self.handlers.get(&action)
    }

    pub fn contains(&self, action: Action) -> bool {
        self.handlers.contains_key(&action)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Actions from `required` that have no handler, in the given order.
    pub fn missing(&self, required: &[Action]) -> Vec<Action> {
        required
            .iter()
            .copied()
            .filter(|action| !self.contains(*action))
            .collect()
    }

    /// Fail if any of `required` has no handler.
    pub fn validate(&self, required: &[Action]) -> Result<(), HostError> {
        let missing = self.missing(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(HostError::MissingHandlers(missing))
        }
    }
}
