//! Host-side error types.

use shared_protocol::Action;
use thiserror::Error;

/// Startup and configuration failures of the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Required actions with no registered handler.
    #[error("missing handlers for actions: {}", join_actions(.0))]
    MissingHandlers(Vec<Action>),

    #[error("configuration error: {0}")]
    Config(String),
}

fn join_actions(actions: &[Action]) -> String {
    actions
        .iter()
        .map(Action::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
