//! Engine configuration.

use adventure_rules::PlayerStats;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Tunables for a [`crate::Session`].
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Skill values a new player starts with.
    pub starting_stats: PlayerStats,

    /// Refuse to start a session on content with broken references.
    /// When off, issues are only logged.
    pub strict_content: bool,

    /// Maximum number of visited nodes remembered per conversation.
    pub history_limit: usize,

    /// Milliseconds per revealed character of dialogue text.
    pub typewriter_ms_per_char: u64,

    /// Pause before the console answers, in milliseconds.
    pub thinking_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_stats: PlayerStats::default(),
            strict_content: true,
            history_limit: 64,
            typewriter_ms_per_char: 30,
            thinking_delay_ms: 1500,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if config.history_limit == 0 {
            return Err(ConfigError::ZeroHistoryLimit);
        }
        Ok(config)
    }

    pub fn typewriter_interval(&self) -> Duration {
        Duration::from_millis(self.typewriter_ms_per_char)
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }
}
