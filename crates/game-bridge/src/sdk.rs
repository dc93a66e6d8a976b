//! Typed game-side SDK.
//!
//! One method per catalog action. Each sends the request through the
//! channel's dispatcher with the default timeout and decodes the host's
//! value into the catalog type.

use crate::channel::BridgeChannel;
use crate::domain::BridgeResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared_protocol::types::{
    BuyInGameItemResponse, GetLeaderboardRequest, GetLeaderboardResponse, HapticFeedbackType,
    InGameItems, InitResponse, ItemPayload, PlayResponse, Player, SdkInitParams, SignPayload,
    TicketBalance, Tournament, TournamentId, TrackScorePayload, UpdateStatePayload,
    UseInGameItemResponse,
};
use shared_protocol::{sign_payload, Action, SDK_VERSION};
use std::sync::Arc;

/// Game-facing API over a [`BridgeChannel`].
#[derive(Clone)]
pub struct GameSdk {
    channel: Arc<BridgeChannel>,
}

impl GameSdk {
    pub fn new(channel: Arc<BridgeChannel>) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &Arc<BridgeChannel> {
        &self.channel
    }

    /// SDK version string. Local, nothing is sent.
    pub fn version(&self) -> &'static str {
        SDK_VERSION
    }

    /// Sign a payload locally with HMAC-SHA256.
    pub fn sign_payload<T: Serialize + ?Sized>(&self, payload: &T, key: &str) -> BridgeResult<String> {
        Ok(sign_payload(payload, Some(key.as_bytes()))?)
    }

    pub async fn init(&self, params: &SdkInitParams) -> BridgeResult<InitResponse> {
        self.call(Action::Init, Some(serde_json::to_value(params)?))
            .await
    }

    pub async fn get_player(&self) -> BridgeResult<Player> {
        self.call(Action::GetPlayer, None).await
    }

    /// Current tournament, or `None` in practice mode.
    ///
    /// A reply without a usable id is practice mode whatever else it
    /// carries, so it is not decoded.
    pub async fn get_tournament(&self) -> BridgeResult<Option<Tournament>> {
        let Some(value) = self.send(Action::GetTournament, None).await? else {
            return Ok(None);
        };
        let has_id = value
            .get("id")
            .and_then(TournamentId::from_json)
            .is_some();
        if !has_id {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Deprecated: tickets were replaced by player energy.
    pub async fn buy_tickets(&self) -> BridgeResult<TicketBalance> {
        self.call(Action::BuyTicket, None).await
    }

    pub async fn play(&self) -> BridgeResult<PlayResponse> {
        self.call(Action::Play, None).await
    }

    pub async fn track_score(&self, game_play_id: &str, score: i64) -> BridgeResult<()> {
        let payload = TrackScorePayload {
            game_play_id: game_play_id.to_string(),
            score,
        };
        self.send(Action::TrackScore, Some(serde_json::to_value(payload)?))
            .await?;
        Ok(())
    }

    /// Submit the final score. Returns the host's signature.
    pub async fn sign_result(
        &self,
        game_play_id: &str,
        game_token: &str,
        score: i64,
    ) -> BridgeResult<String> {
        let payload = SignPayload {
            game_play_id: game_play_id.to_string(),
            game_token: game_token.to_string(),
            score,
        };
        self.call(Action::SignResult, Some(serde_json::to_value(payload)?))
            .await
    }

    /// Persist game state. An empty answer counts as not stored.
    pub async fn update_state(&self, payload: &UpdateStatePayload) -> BridgeResult<bool> {
        let stored: Option<bool> = self
            .call(Action::UpdateState, Some(serde_json::to_value(payload)?))
            .await?;
        Ok(stored.unwrap_or(false))
    }

    pub async fn show_leaderboard(&self) -> BridgeResult<()> {
        self.send(Action::ShowLeaderboard, None).await?;
        Ok(())
    }

    pub async fn get_leaderboard(
        &self,
        request: &GetLeaderboardRequest,
    ) -> BridgeResult<GetLeaderboardResponse> {
        self.call(Action::GetLeaderboard, Some(serde_json::to_value(request)?))
            .await
    }

    pub async fn show_shop(&self) -> BridgeResult<()> {
        self.send(Action::ShowShop, None).await?;
        Ok(())
    }

    pub async fn get_in_game_items(&self) -> BridgeResult<InGameItems> {
        self.call(Action::GetInGameItems, None).await
    }

    pub async fn buy_in_game_item(&self, payload: &ItemPayload) -> BridgeResult<BuyInGameItemResponse> {
        self.call(Action::BuyInGameItem, Some(serde_json::to_value(payload)?))
            .await
    }

    pub async fn use_in_game_item(&self, payload: &ItemPayload) -> BridgeResult<UseInGameItemResponse> {
        self.call(Action::UseInGameItem, Some(serde_json::to_value(payload)?))
            .await
    }

    pub async fn exit(&self, confirm: bool) -> BridgeResult<()> {
        self.send(Action::Exit, Some(Value::Bool(confirm))).await?;
        Ok(())
    }

    pub async fn exit_to_list_games(&self, confirm: bool) -> BridgeResult<()> {
        self.send(Action::ExitToListGames, Some(Value::Bool(confirm)))
            .await?;
        Ok(())
    }

    pub async fn trigger_haptic_feedback(&self, kind: HapticFeedbackType) -> BridgeResult<()> {
        self.send(Action::TriggerHapticFeedback, Some(serde_json::to_value(kind)?))
            .await?;
        Ok(())
    }

    async fn send(&self, action: Action, data: Option<Value>) -> BridgeResult<Option<Value>> {
        self.channel.dispatch(action.as_str(), data).await
    }

    async fn call<T: DeserializeOwned>(&self, action: Action, data: Option<Value>) -> BridgeResult<T> {
        let value = self.send(action, data).await?;
        Ok(serde_json::from_value(value.unwrap_or(Value::Null))?)
    }
}
