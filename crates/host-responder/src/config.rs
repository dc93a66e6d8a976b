//! Host configuration.

use serde::{Deserialize, Serialize};
use shared_protocol::PROTOCOL_TAG;

/// Host responder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Only requests carrying this tag are answered
    pub protocol_tag: String,
    /// Refuse to start unless every catalog action has a handler
    pub require_all_actions: bool,
    /// Key for result signatures; unkeyed SHA-256 when absent
    pub signing_key: Option<String>,
    /// Demo player seed
    pub player: PlayerSeed,
}

/// Initial state of the demo player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSeed {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub level: u32,
    pub energy: i64,
    /// Energy consumed per game
    pub game_energy: i64,
    pub balance_nps: i64,
    pub point_conversion_rate: f64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            protocol_tag: PROTOCOL_TAG.to_string(),
            require_all_actions: true,
            signing_key: None,
            player: PlayerSeed::default(),
        }
    }
}

impl Default for PlayerSeed {
    fn default() -> Self {
        Self {
            id: "p1".to_string(),
            name: "Player 1".to_string(),
            avatar: Some("https://thispersondoesnotexist.com/".to_string()),
            level: 1,
            energy: 300,
            game_energy: 20,
            balance_nps: 100,
            point_conversion_rate: 0.6,
        }
    }
}

impl HostConfig {
    /// Build from defaults overridden by environment variables.
    ///
    /// - `BRIDGE_PROTOCOL_TAG`: protocol tag (default: game-sdk)
    /// - `HOST_SIGNING_KEY`: result signing key
    /// - `HOST_PLAYER_ENERGY`: starting energy of the demo player
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(tag) = std::env::var("BRIDGE_PROTOCOL_TAG") {
            config.protocol_tag = tag;
        }
        if let Ok(key) = std::env::var("HOST_SIGNING_KEY") {
            config.signing_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(energy) = std::env::var("HOST_PLAYER_ENERGY")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            config.player.energy = energy;
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), crate::HostError> {
        if self.protocol_tag.trim().is_empty() {
            return Err(crate::HostError::Config(
                "protocol_tag cannot be empty".into(),
            ));
        }

        if self.player.game_energy <= 0 {
            return Err(crate::HostError::Config(
                "player.game_energy must be positive".into(),
            ));
        }

        if !(0.0..=1000.0).contains(&self.player.point_conversion_rate) {
            return Err(crate::HostError::Config(
                "player.point_conversion_rate out of range".into(),
            ));
        }

        Ok(())
    }
}
