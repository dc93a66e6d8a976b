//! In-memory demo host.
//!
//! Serves every catalog action against a single simulated player. Used by
//! the demo runtime and by the integration tests.

use crate::config::{HostConfig, PlayerSeed};
use crate::registry::{ActionRegistry, HandlerResult};
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared_protocol::types::{
    BuyInGameItemResponse, GameState, GetLeaderboardRequest, GetLeaderboardResponse,
    HapticFeedbackType, InGameItem, InGameItems, InitResponse, InventoryEntry, ItemPayload,
    LeaderboardEntry, PlayResponse, Player, SdkInitParams, SignPayload, Tournament,
    TournamentId, TrackScorePayload, UpdateStatePayload, UseInGameItemResponse,
};
use shared_protocol::{sign_payload, Action, ErrorCode, RemoteError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Mutable demo state
#[derive(Debug)]
struct DemoState {
    player: Player,
    /// Last tracked score per game play
    tracked: HashMap<String, i64>,
    plays: u64,
    receipts: u64,
    exited: bool,
}

/// A host that keeps its player in memory.
pub struct DemoHost {
    state: Mutex<DemoState>,
    shop: Vec<InGameItem>,
    signing_key: Option<String>,
}

impl DemoHost {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            state: Mutex::new(DemoState {
                player: seed_player(&config.player),
                tracked: HashMap::new(),
                plays: 0,
                receipts: 0,
                exited: false,
            }),
            shop: vec![InGameItem {
                id: "item1".to_string(),
                name: "Booster".to_string(),
                price: 10,
            }],
            signing_key: config.signing_key.clone(),
        }
    }

    /// Registry with a handler for every catalog action.
    pub fn registry(self: &Arc<Self>) -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        for action in Action::ALL {
            let host = Arc::clone(self);
            registry.register_fn(action, move |data| host.serve(action, data));
        }
        registry
    }

    /// Snapshot of the player.
    pub fn player(&self) -> Player {
        self.state.lock().player.clone()
    }

    /// Last score tracked for a game play.
    pub fn tracked_score(&self, game_play_id: &str) -> Option<i64> {
        self.state.lock().tracked.get(game_play_id).copied()
    }

    pub fn has_exited(&self) -> bool {
        self.state.lock().exited
    }

    fn serve(&self, action: Action, data: Option<Value>) -> HandlerResult {
        match action {
            Action::Init => self.on_init(decode(data)?),
            Action::GetPlayer => encode(&self.player()),
            Action::GetTournament => self.on_get_tournament(),
            Action::BuyTicket => Err(RemoteError::system("not supported")),
            Action::Play => self.on_play(),
            Action::TrackScore => self.on_track_score(decode(data)?),
            Action::SignResult => self.on_sign_result(decode(data)?),
            Action::UpdateState => self.on_update_state(decode(data)?),
            Action::ShowLeaderboard => {
                info!("Show leaderboard");
                Ok(None)
            }
            Action::GetLeaderboard => self.on_get_leaderboard(decode(data)?),
            Action::ShowShop => {
                info!("Open the shop");
                Ok(None)
            }
            Action::GetInGameItems => encode(&InGameItems {
                items: self.shop.clone(),
            }),
            Action::BuyInGameItem => self.on_buy_item(decode(data)?),
            Action::UseInGameItem => self.on_use_item(decode(data)?),
            Action::Exit | Action::ExitToListGames => {
                info!(action = %action, "Game exited");
                self.state.lock().exited = true;
                Ok(None)
            }
            Action::TriggerHapticFeedback => {
                let kind: HapticFeedbackType = decode(data)?;
                info!(kind = ?kind, "Haptic feedback");
                Ok(None)
            }
        }
    }

    fn on_init(&self, params: SdkInitParams) -> HandlerResult {
        info!(
            client_id = %params.client_id,
            version = params.version.as_deref().unwrap_or("latest"),
            "Game initialized"
        );
        encode(&InitResponse {
            current_timestamp: Utc::now().to_rfc3339(),
        })
    }

    fn on_get_tournament(&self) -> HandlerResult {
        let now = Utc::now();
        let state = self.state.lock();
        let tickets = state
            .player
            .energy
            .checked_div(state.player.game_energy)
            .unwrap_or(0);

        encode(&Tournament {
            id: Some(TournamentId::from("tour1")),
            name: "Tournament 1".to_string(),
            start_time: (now - ChronoDuration::days(30)).to_rfc3339(),
            end_time: (now + ChronoDuration::days(30)).to_rfc3339(),
            tickets: u32::try_from(tickets.max(0)).unwrap_or(u32::MAX),
        })
    }

    fn on_play(&self) -> HandlerResult {
        let mut state = self.state.lock();
        let cost = state.player.game_energy;
        if cost <= 0 {
            return Err(RemoteError::system("invalid game energy"));
        }
        if state.player.energy < cost {
            return Err(RemoteError::with_code(
                ErrorCode::NotEnoughEnergy,
                "not enough energy",
            ));
        }

        state.player.energy -= cost;
        state.plays += 1;
        state.exited = false;

        encode(&PlayResponse {
            game_play_id: format!("gp-{}", state.plays),
            token: format!("{:016x}", rand::random::<u64>()),
            remaining_tickets: state.player.energy / cost,
            energy: state.player.energy,
        })
    }

    fn on_track_score(&self, payload: TrackScorePayload) -> HandlerResult {
        info!(game_play_id = %payload.game_play_id, score = payload.score, "Track score");
        self.state
            .lock()
            .tracked
            .insert(payload.game_play_id, payload.score);
        Ok(None)
    }

    fn on_sign_result(&self, payload: SignPayload) -> HandlerResult {
        if payload.score < 0 {
            return Err(RemoteError::with_code(
                ErrorCode::InvalidScore,
                "score cannot be negative",
            ));
        }

        let signature = sign_payload(&payload, self.signing_key.as_deref().map(str::as_bytes))
            .map_err(|e| RemoteError::system(e.to_string()))?;

        let mut state = self.state.lock();
        let player = &mut state.player;
        let nps = (payload.score as f64 * player.point_conversion_rate).floor() as i64;

        player.total_score += payload.score;
        player.balance = player.total_score;
        player.balance_nps += nps;
        if player.high_score.map_or(true, |high| payload.score > high) {
            player.high_score = Some(payload.score);
        }

        info!(
            game_play_id = %payload.game_play_id,
            score = payload.score,
            nps = nps,
            "Result signed"
        );
        encode(&signature)
    }

    fn on_update_state(&self, payload: UpdateStatePayload) -> HandlerResult {
        info!(game_play_id = %payload.game_play_id, "Update state");
        self.state.lock().player.state = Some(payload.state);
        encode(&true)
    }

    fn on_get_leaderboard(&self, request: GetLeaderboardRequest) -> HandlerResult {
        let player = self.player();
        let me = LeaderboardEntry {
            rank: 1,
            score: player.total_score,
            player,
        };
        let players = if request.limit == 0 {
            Vec::new()
        } else {
            vec![me.clone()]
        };

        encode(&GetLeaderboardResponse {
            players,
            me: Some(me),
        })
    }

    fn on_buy_item(&self, payload: ItemPayload) -> HandlerResult {
        let item = self
            .shop
            .iter()
            .find(|item| item.id == payload.item_id)
            .cloned()
            .ok_or_else(|| unknown_item(&payload.item_id))?;

        let mut state = self.state.lock();
        if state.player.balance_nps < item.price {
            return Err(RemoteError::with_code(
                ErrorCode::NotEnoughNps,
                "not enough NPS",
            ));
        }
        state.player.balance_nps -= item.price;
        add_to_inventory(&mut state.player.inventory, &item.id);
        state.receipts += 1;

        encode(&BuyInGameItemResponse {
            receipt: format!("rcpt-{}", state.receipts),
            item,
        })
    }

    fn on_use_item(&self, payload: ItemPayload) -> HandlerResult {
        let mut state = self.state.lock();
        let inventory = &mut state.player.inventory;

        let entry = inventory
            .iter_mut()
            .find(|entry| entry.item_id == payload.item_id && entry.quantity > 0)
            .ok_or_else(|| unknown_item(&payload.item_id))?;
        entry.quantity -= 1;
        inventory.retain(|entry| entry.quantity > 0);

        encode(&UseInGameItemResponse {
            success: true,
            inventory: inventory.clone(),
        })
    }
}

fn seed_player(seed: &PlayerSeed) -> Player {
    Player {
        id: seed.id.clone(),
        name: seed.name.clone(),
        level: Some(seed.level),
        avatar: seed.avatar.clone(),
        balance: 0,
        total_score: 0,
        high_score: None,
        inventory: Vec::new(),
        energy: seed.energy,
        game_energy: seed.game_energy,
        balance_nps: seed.balance_nps,
        point_conversion_rate: seed.point_conversion_rate,
        state: Some(GameState {
            signature: "0x0000".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            data: serde_json::json!({}),
        }),
    }
}

fn add_to_inventory(inventory: &mut Vec<InventoryEntry>, item_id: &str) {
    match inventory.iter_mut().find(|entry| entry.item_id == item_id) {
        Some(entry) => entry.quantity += 1,
        None => inventory.push(InventoryEntry {
            item_id: item_id.to_string(),
            quantity: 1,
        }),
    }
}

fn unknown_item(item_id: &str) -> RemoteError {
    RemoteError::with_code(ErrorCode::InvalidRequest, format!("unknown item {item_id}"))
}

fn decode<T: DeserializeOwned>(data: Option<Value>) -> Result<T, RemoteError> {
    serde_json::from_value(data.unwrap_or(Value::Null)).map_err(|e| {
        RemoteError::with_code(ErrorCode::InvalidRequest, format!("invalid payload: {e}"))
    })
}

fn encode<T: Serialize + ?Sized>(value: &T) -> HandlerResult {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| RemoteError::system(e.to_string()))
}
