//! Error types for the bridge client.

use crate::transport::TransportError;
use shared_protocol::{codes, ErrorCode, RemoteError, RequestId, SignatureError};
use std::time::Duration;
use thiserror::Error;

/// Why a dispatched request did not produce a value.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No response arrived within the request's timeout.
    #[error("timeout")]
    Timeout { request_id: RequestId, after: Duration },

    /// The host answered with an error.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Action name was empty. Nothing was sent.
    #[error("action name must not be empty")]
    InvalidAction,

    /// The request could not be posted.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The channel was torn down before the request settled.
    #[error("bridge channel closed")]
    ChannelClosed,

    /// Every representable request id has been used.
    #[error("request ids exhausted")]
    IdsExhausted,

    /// The host's value did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local payload signing failed.
    #[error("signing failed: {0}")]
    Signature(#[from] SignatureError),
}

impl BridgeError {
    /// Numeric code: the host's code for remote errors, system error otherwise.
    pub fn code(&self) -> i32 {
        match self {
            BridgeError::Remote(err) => err.code,
            _ => codes::SYSTEM_ERROR,
        }
    }

    /// The reserved code, if [`code`](Self::code) is one.
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::Timeout { .. })
    }

    /// The remote error, if the host reported one.
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            BridgeError::Remote(err) => Some(err),
            _ => None,
        }
    }
}

/// Result alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
