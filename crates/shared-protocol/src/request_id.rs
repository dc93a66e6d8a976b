//! Request identifier for correlating responses with in-flight requests.
//!
//! Ids are positive integers. Zero is unrepresentable, so a response echoing
//! `0` (or anything non-positive) can never match a pending request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Correlation id carried in every request and echoed by every response.
///
/// Serialized as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(NonZeroU64);

impl RequestId {
    /// The first id handed out by a fresh allocator.
    pub const FIRST: RequestId = RequestId(NonZeroU64::MIN);

    /// Create from a raw value. Returns `None` for zero.
    pub fn new(value: u64) -> Option<Self> {
        NonZeroU64::new(value).map(Self)
    }

    /// Interpret a wire value as a request id.
    ///
    /// Only positive integers are accepted; floats, strings, zero and
    /// negative numbers are protocol violations.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        value.as_u64().and_then(Self::new)
    }

    /// Get the raw value.
    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NonZeroU64> for RequestId {
    fn from(value: NonZeroU64) -> Self {
        Self(value)
    }
}

impl From<RequestId> for u64 {
    fn from(id: RequestId) -> Self {
        id.get()
    }
}
