//! Bridge configuration with validation.

use serde::{Deserialize, Serialize};
use shared_protocol::PROTOCOL_TAG;
use std::time::Duration;

/// Client-side bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Discriminator stamped on every outbound request
    pub protocol_tag: String,
    /// Timeout applied when a caller does not pass one. Zero disables it.
    #[serde(with = "humantime_serde")]
    pub default_timeout: Duration,
    /// Capacity of in-memory transport queues
    pub channel_buffer: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            protocol_tag: PROTOCOL_TAG.to_string(),
            default_timeout: Duration::from_secs(60),
            channel_buffer: 64,
        }
    }
}

impl BridgeConfig {
    /// Build from defaults overridden by `BRIDGE_*` environment variables.
    ///
    /// Unparseable values are ignored and the default kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(tag) = std::env::var("BRIDGE_PROTOCOL_TAG") {
            config.protocol_tag = tag;
        }
        if let Some(secs) = env_parse::<u64>("BRIDGE_DEFAULT_TIMEOUT_SECS") {
            config.default_timeout = Duration::from_secs(secs);
        }
        if let Some(buffer) = env_parse::<usize>("BRIDGE_CHANNEL_BUFFER") {
            config.channel_buffer = buffer;
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol_tag.trim().is_empty() {
            return Err(ConfigError::EmptyProtocolTag);
        }

        if self.channel_buffer == 0 {
            return Err(ConfigError::InvalidBuffer(
                "channel_buffer cannot be 0".into(),
            ));
        }

        Ok(())
    }

    pub fn with_protocol_tag(mut self, tag: impl Into<String>) -> Self {
        self.protocol_tag = tag.into();
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("protocol tag cannot be empty")]
    EmptyProtocolTag,
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),
}
