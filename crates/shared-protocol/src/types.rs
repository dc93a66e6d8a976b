//! Payload and result types for the action catalog.
//!
//! The bridge core never looks inside these; they exist so the typed SDK
//! facade and the demo host agree on field names. Everything is camelCase
//! on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// INIT parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkInitParams {
    pub client_id: String,
    /// Defaults to the latest version on the host side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    /// ISO 8601 timestamp.
    pub current_timestamp: String,
}

/// Signed game state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub signature: String,
    /// ISO 8601 timestamp.
    pub timestamp: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Total game points. Superseded by `total_score`.
    #[serde(default)]
    pub balance: i64,
    #[serde(default)]
    pub total_score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_score: Option<i64>,
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
    pub energy: i64,
    /// Energy consumed per game.
    pub game_energy: i64,
    #[serde(rename = "balanceNPS", default)]
    pub balance_nps: i64,
    /// Ratio for converting game points to NPS.
    #[serde(default)]
    pub point_conversion_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<GameState>,
}

/// Tournament identifier. Hosts send either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TournamentId {
    Number(u64),
    Text(String),
}

impl TournamentId {
    /// Read an id off a raw tournament value.
    ///
    /// Zero, the empty string, `null` and anything else falsy is no id.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().filter(|n| *n != 0).map(Self::Number),
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0,
            Self::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for TournamentId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<u64> for TournamentId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    /// A missing id means practice mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TournamentId>,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    /// Deprecated, replaced by player energy.
    #[serde(default)]
    pub tickets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketBalance {
    pub balance: i64,
    pub tickets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResponse {
    pub game_play_id: String,
    /// One-time token used to submit the score.
    pub token: String,
    pub remaining_tickets: i64,
    pub energy: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackScorePayload {
    pub game_play_id: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignPayload {
    pub game_play_id: String,
    pub game_token: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatePayload {
    pub game_play_id: String,
    pub state: GameState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetLeaderboardRequest {
    pub limit: u32,
    pub after: String,
    pub before: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub player: Player,
    pub rank: u32,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetLeaderboardResponse {
    pub players: Vec<LeaderboardEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub me: Option<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InGameItem {
    pub id: String,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InGameItems {
    #[serde(default)]
    pub items: Vec<InGameItem>,
}

/// BUY_INGAME_ITEM / USE_INGAME_ITEM payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gameplay_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyInGameItemResponse {
    pub receipt: String,
    pub item: InGameItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseInGameItemResponse {
    pub success: bool,
    pub inventory: Vec<InventoryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HapticFeedbackType {
    ImpactLight,
    ImpactMedium,
    ImpactHeavy,
    ImpactRigid,
    ImpactSoft,
    NotiSuccess,
    NotiWarning,
    NotiError,
}
