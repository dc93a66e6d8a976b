//! Scripted game session.
//!
//! Plays the part of a game: initializes, reads the player and tournament,
//! then plays rounds until it runs out of rounds or energy, submitting and
//! signing each score and saving state after every round.

use chrono::Utc;
use game_bridge::{BridgeError, BridgeResult, GameSdk};
use serde_json::json;
use shared_protocol::types::{
    GameState, GetLeaderboardRequest, HapticFeedbackType, SdkInitParams, UpdateStatePayload,
};
use shared_protocol::ErrorCode;
use tracing::{info, warn};

/// Key the game uses to sign its own state snapshots.
const STATE_KEY: &str = "demo-state-key";

/// What a session achieved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionReport {
    pub player_id: String,
    pub tournament_id: Option<String>,
    pub rounds_played: u32,
    /// Host-issued signatures, one per round
    pub signatures: Vec<String>,
    pub total_score: i64,
    pub balance_nps: i64,
    pub energy_left: i64,
    /// Why the session ended before its last round, if it did
    pub stopped_early: Option<String>,
}

/// Score awarded for a round.
pub fn round_score(round: u32) -> i64 {
    25 * i64::from(round + 1)
}

/// Run a session of up to `rounds` rounds.
pub async fn play_session(sdk: &GameSdk, client_id: &str, rounds: u32) -> BridgeResult<SessionReport> {
    let init = sdk
        .init(&SdkInitParams {
            client_id: client_id.to_string(),
            version: Some(sdk.version().to_string()),
        })
        .await?;
    info!(host_time = %init.current_timestamp, "Session started");

    let player = sdk.get_player().await?;
    let tournament = sdk.get_tournament().await?;
    let mut report = SessionReport {
        player_id: player.id.clone(),
        tournament_id: tournament.and_then(|t| t.id).map(|id| id.to_string()),
        energy_left: player.energy,
        ..Default::default()
    };

    for round in 0..rounds {
        let play = match sdk.play().await {
            Ok(play) => play,
            Err(BridgeError::Remote(e)) if e.error_code() == Some(ErrorCode::NotEnoughEnergy) => {
                warn!(round = round, "Out of energy");
                report.stopped_early = Some(e.message);
                break;
            }
            Err(e) => return Err(e),
        };

        let score = round_score(round);
        sdk.track_score(&play.game_play_id, score).await?;
        let signature = sdk
            .sign_result(&play.game_play_id, &play.token, score)
            .await?;

        let data = json!({"round": round + 1, "lastScore": score});
        let state = GameState {
            signature: sdk.sign_payload(&data, STATE_KEY)?,
            timestamp: Utc::now().to_rfc3339(),
            data,
        };
        sdk.update_state(&UpdateStatePayload {
            game_play_id: play.game_play_id.clone(),
            state,
        })
        .await?;
        sdk.trigger_haptic_feedback(HapticFeedbackType::NotiSuccess)
            .await?;

        info!(
            round = round + 1,
            game_play_id = %play.game_play_id,
            score = score,
            energy = play.energy,
            "Round finished"
        );

        report.rounds_played += 1;
        report.signatures.push(signature);
    }

    let leaderboard = sdk
        .get_leaderboard(&GetLeaderboardRequest {
            limit: 10,
            after: String::new(),
            before: String::new(),
        })
        .await?;
    if let Some(me) = leaderboard.me {
        info!(rank = me.rank, score = me.score, "Leaderboard position");
    }

    let player = sdk.get_player().await?;
    report.total_score = player.total_score;
    report.balance_nps = player.balance_nps;
    report.energy_left = player.energy;

    sdk.exit_to_list_games(true).await?;
    Ok(report)
}
