//! Request and response envelopes exchanged over the message channel.
//!
//! The channel carries structured JSON values and is shared with unrelated
//! traffic, so decoding is strict about what counts as one of ours and
//! reports everything else as a [`CodecError`] for the caller to drop.
//!
//! ## Wire shapes
//!
//! ```text
//! request:  { source: "game-sdk", requestId: 7, action: "GET_PLAYER", data: null }
//! success:  { requestId: 7, _payload: <value|null> }
//! legacy:   { requestId: 7, ...fields }            (decoded as Some({...fields}))
//! bare:     { requestId: 7 }                       (decoded as None)
//! error:    { requestId: 7, error: "message", code: 130 }
//! ```

use crate::error_code::{codes, ErrorCode};
use crate::request_id::RequestId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Default protocol discriminator carried in every request.
pub const PROTOCOL_TAG: &str = "game-sdk";

/// Key that carries an explicit success value in a response.
pub const PAYLOAD_KEY: &str = "_payload";

const REQUEST_ID_KEY: &str = "requestId";
const SOURCE_KEY: &str = "source";
const ACTION_KEY: &str = "action";
const DATA_KEY: &str = "data";
const ERROR_KEY: &str = "error";
const CODE_KEY: &str = "code";

/// Reasons an inbound value is not an envelope we can use.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("message is not an object")]
    NotAnObject,
    #[error("message has no requestId")]
    MissingRequestId,
    /// Zero, negative, fractional or non-numeric id.
    #[error("invalid requestId: {0}")]
    InvalidRequestId(Value),
    #[error("message belongs to source {0}")]
    ForeignSource(String),
    #[error("request has no action")]
    MissingAction,
}

/// A failure reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("[{code}] {message}")]
pub struct RemoteError {
    /// Reserved code or whatever the host supplied.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
}

impl RemoteError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Error carrying the reserved system-error code.
    pub fn system(message: impl Into<String>) -> Self {
        Self::new(codes::SYSTEM_ERROR, message)
    }

    pub fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code.code(), message)
    }

    /// The reserved code, if the numeric code is one.
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }
}

/// Outbound call from the game to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    /// Protocol discriminator.
    pub source: String,
    pub request_id: RequestId,
    /// Remote operation name, never empty.
    pub action: String,
    /// Opaque payload; `None` goes out as `null`.
    #[serde(default)]
    pub data: Option<Value>,
}

impl RequestEnvelope {
    pub fn new(
        source: impl Into<String>,
        request_id: RequestId,
        action: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            source: source.into(),
            request_id,
            action: action.into(),
            data,
        }
    }

    /// Encode for posting on the channel.
    pub fn to_message(&self) -> Value {
        json!({
            SOURCE_KEY: self.source,
            REQUEST_ID_KEY: self.request_id,
            ACTION_KEY: self.action,
            DATA_KEY: self.data,
        })
    }

    /// Decode a request addressed to `expected_source`.
    pub fn from_message(message: &Value, expected_source: &str) -> Result<Self, CodecError> {
        let obj = message.as_object().ok_or(CodecError::NotAnObject)?;

        match obj.get(SOURCE_KEY).and_then(Value::as_str) {
            Some(source) if source == expected_source => {}
            Some(other) => return Err(CodecError::ForeignSource(other.to_string())),
            None => return Err(CodecError::ForeignSource(String::new())),
        }

        let request_id = decode_request_id(obj)?;

        let action = obj
            .get(ACTION_KEY)
            .and_then(Value::as_str)
            .filter(|a| !a.is_empty())
            .ok_or(CodecError::MissingAction)?;

        let data = obj.get(DATA_KEY).filter(|v| !v.is_null()).cloned();

        Ok(Self::new(expected_source, request_id, action, data))
    }
}

/// Result carried by a response: an explicit optional value or an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Success(Option<Value>),
    Error(RemoteError),
}

impl ResponseBody {
    pub fn into_result(self) -> Result<Option<Value>, RemoteError> {
        match self {
            ResponseBody::Success(value) => Ok(value),
            ResponseBody::Error(err) => Err(err),
        }
    }
}

impl From<Result<Option<Value>, RemoteError>> for ResponseBody {
    fn from(result: Result<Option<Value>, RemoteError>) -> Self {
        match result {
            Ok(value) => ResponseBody::Success(value),
            Err(err) => ResponseBody::Error(err),
        }
    }
}

/// Reply from the host to one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// Echo of the originating request id; correlation only.
    pub request_id: RequestId,
    pub body: ResponseBody,
}

impl ResponseEnvelope {
    pub fn success(request_id: RequestId, value: Option<Value>) -> Self {
        Self {
            request_id,
            body: ResponseBody::Success(value),
        }
    }

    pub fn error(request_id: RequestId, error: RemoteError) -> Self {
        Self {
            request_id,
            body: ResponseBody::Error(error),
        }
    }

    /// Encode for posting on the channel.
    ///
    /// Success values always travel under [`PAYLOAD_KEY`], so an absent
    /// result is never confused with an empty object.
    pub fn to_message(&self) -> Value {
        match &self.body {
            ResponseBody::Success(value) => json!({
                REQUEST_ID_KEY: self.request_id,
                PAYLOAD_KEY: value,
            }),
            ResponseBody::Error(err) => json!({
                REQUEST_ID_KEY: self.request_id,
                ERROR_KEY: err.message,
                CODE_KEY: err.code,
            }),
        }
    }

    /// Decode an inbound response.
    ///
    /// Messages carrying a `source` tag are requests (ours looped back, or
    /// another protocol's) and are never responses.
    pub fn from_message(message: &Value) -> Result<Self, CodecError> {
        let obj = message.as_object().ok_or(CodecError::NotAnObject)?;

        if let Some(source) = obj.get(SOURCE_KEY) {
            let tag = source
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| source.to_string());
            return Err(CodecError::ForeignSource(tag));
        }

        let request_id = decode_request_id(obj)?;

        if let Some(error) = obj.get(ERROR_KEY).filter(|v| !v.is_null()) {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let code = obj
                .get(CODE_KEY)
                .and_then(Value::as_i64)
                .and_then(|c| i32::try_from(c).ok())
                .unwrap_or(codes::SYSTEM_ERROR);
            return Ok(Self::error(request_id, RemoteError::new(code, message)));
        }

        if let Some(payload) = obj.get(PAYLOAD_KEY) {
            let value = (!payload.is_null()).then(|| payload.clone());
            return Ok(Self::success(request_id, value));
        }

        let rest: Map<String, Value> = obj
            .iter()
            .filter(|(key, _)| key.as_str() != REQUEST_ID_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        // A serialized `_payload: undefined` leaves only the id behind.
        let value = (!rest.is_empty()).then_some(Value::Object(rest));
        Ok(Self::success(request_id, value))
    }
}

fn decode_request_id(obj: &Map<String, Value>) -> Result<RequestId, CodecError> {
    let raw = obj.get(REQUEST_ID_KEY).ok_or(CodecError::MissingRequestId)?;
    RequestId::from_json(raw).ok_or_else(|| CodecError::InvalidRequestId(raw.clone()))
}
