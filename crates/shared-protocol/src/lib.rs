//! # Shared Protocol
//!
//! Wire types shared by both ends of the game/host message bridge.
//!
//! ## Contents
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `request_id` | Positive correlation ids |
//! | `envelope` | Request/response envelopes and their JSON codec |
//! | `error_code` | Reserved error codes |
//! | `action` | The SDK action catalog |
//! | `types` | Payload/result types for catalog actions |
//! | `signature` | HMAC-SHA256 payload signing |
//!
//! The channel is shared with unrelated traffic. Anything that fails to
//! decode is somebody else's message and is dropped by the caller, never
//! treated as a failure of an in-flight request.

#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod action;
pub mod envelope;
pub mod error_code;
pub mod request_id;
pub mod signature;
pub mod types;

pub use action::{Action, UnknownAction};
pub use envelope::{
    CodecError, RemoteError, RequestEnvelope, ResponseBody, ResponseEnvelope, PAYLOAD_KEY,
    PROTOCOL_TAG,
};
pub use error_code::{codes, ErrorCode};
pub use request_id::RequestId;
pub use signature::{sign_payload, verify_payload, SignatureError};

/// SDK version reported to games.
pub const SDK_VERSION: &str = "1.1.0";
