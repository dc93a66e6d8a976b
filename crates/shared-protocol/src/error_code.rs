//! Reserved error codes shared by the game and host sides.
//!
//! Values are part of the wire protocol and must not change. Codes that are
//! not listed here may still arrive from a host; they are carried as raw
//! `i32` in [`RemoteError`](crate::RemoteError).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw code constants.
pub mod codes {
    /// Something went wrong (also used for every local failure).
    pub const SYSTEM_ERROR: i32 = -1;
    pub const INVALID_REQUEST: i32 = 10;
    /// Tournament has ended or is disabled.
    pub const TOUR_NOT_AVAILABLE: i32 = 100;
    /// Not enough NPS to buy tickets or items.
    pub const NOT_ENOUGH_NPS: i32 = 110;
    /// Score was not accepted (cheat detected).
    pub const INVALID_SCORE: i32 = 120;
    /// User rejected the transaction (buy tickets or items).
    pub const USER_REJECT: i32 = 130;
    pub const NOT_ENOUGH_TICKET: i32 = 140;
    pub const NOT_ENOUGH_ENERGY: i32 = 150;
}

/// Well-known error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ErrorCode {
    SystemError,
    InvalidRequest,
    TourNotAvailable,
    NotEnoughNps,
    InvalidScore,
    UserReject,
    NotEnoughTicket,
    NotEnoughEnergy,
}

impl ErrorCode {
    /// Every reserved code.
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::SystemError,
        ErrorCode::InvalidRequest,
        ErrorCode::TourNotAvailable,
        ErrorCode::NotEnoughNps,
        ErrorCode::InvalidScore,
        ErrorCode::UserReject,
        ErrorCode::NotEnoughTicket,
        ErrorCode::NotEnoughEnergy,
    ];

    /// Numeric wire value.
    pub const fn code(self) -> i32 {
        match self {
            ErrorCode::SystemError => codes::SYSTEM_ERROR,
            ErrorCode::InvalidRequest => codes::INVALID_REQUEST,
            ErrorCode::TourNotAvailable => codes::TOUR_NOT_AVAILABLE,
            ErrorCode::NotEnoughNps => codes::NOT_ENOUGH_NPS,
            ErrorCode::InvalidScore => codes::INVALID_SCORE,
            ErrorCode::UserReject => codes::USER_REJECT,
            ErrorCode::NotEnoughTicket => codes::NOT_ENOUGH_TICKET,
            ErrorCode::NotEnoughEnergy => codes::NOT_ENOUGH_ENERGY,
        }
    }

    /// Look up a reserved code by its wire value.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        ErrorCode::from_code(value).ok_or_else(|| format!("unknown error code {}", value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::SystemError => "SYSTEM_ERROR",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::TourNotAvailable => "TOUR_NOT_AVAILABLE",
            ErrorCode::NotEnoughNps => "NOT_ENOUGH_NPS",
            ErrorCode::InvalidScore => "INVALID_SCORE",
            ErrorCode::UserReject => "USER_REJECT",
            ErrorCode::NotEnoughTicket => "NOT_ENOUGH_TICKET",
            ErrorCode::NotEnoughEnergy => "NOT_ENOUGH_ENERGY",
        };
        write!(f, "{}({})", name, self.code())
    }
}
