//! The SDK action catalog.
//!
//! The correlation core treats action names as opaque strings; this catalog
//! is what the typed SDK facade sends and what the host responder registers
//! handlers for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named remote operation served by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Init,
    GetPlayer,
    GetTournament,
    BuyTicket,
    Play,
    TrackScore,
    SignResult,
    UpdateState,
    ShowLeaderboard,
    GetLeaderboard,
    ShowShop,
    #[serde(rename = "GET_INGAME_ITEMS")]
    GetInGameItems,
    #[serde(rename = "BUY_INGAME_ITEM")]
    BuyInGameItem,
    #[serde(rename = "USE_INGAME_ITEM")]
    UseInGameItem,
    Exit,
    ExitToListGames,
    TriggerHapticFeedback,
}

impl Action {
    /// Every action in the catalog.
    pub const ALL: [Action; 17] = [
        Action::Init,
        Action::GetPlayer,
        Action::GetTournament,
        Action::BuyTicket,
        Action::Play,
        Action::TrackScore,
        Action::SignResult,
        Action::UpdateState,
        Action::ShowLeaderboard,
        Action::GetLeaderboard,
        Action::ShowShop,
        Action::GetInGameItems,
        Action::BuyInGameItem,
        Action::UseInGameItem,
        Action::Exit,
        Action::ExitToListGames,
        Action::TriggerHapticFeedback,
    ];

    /// Wire name of the action.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Init => "INIT",
            Action::GetPlayer => "GET_PLAYER",
            Action::GetTournament => "GET_TOURNAMENT",
            Action::BuyTicket => "BUY_TICKET",
            Action::Play => "PLAY",
            Action::TrackScore => "TRACK_SCORE",
            Action::SignResult => "SIGN_RESULT",
            Action::UpdateState => "UPDATE_STATE",
            Action::ShowLeaderboard => "SHOW_LEADERBOARD",
            Action::GetLeaderboard => "GET_LEADERBOARD",
            Action::ShowShop => "SHOW_SHOP",
            Action::GetInGameItems => "GET_INGAME_ITEMS",
            Action::BuyInGameItem => "BUY_INGAME_ITEM",
            Action::UseInGameItem => "USE_INGAME_ITEM",
            Action::Exit => "EXIT",
            Action::ExitToListGames => "EXIT_TO_LIST_GAMES",
            Action::TriggerHapticFeedback => "TRIGGER_HAPTIC_FEEDBACK",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an action name is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
