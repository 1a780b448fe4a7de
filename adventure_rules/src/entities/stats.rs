//! Player skill values.

use serde::{Deserialize, Serialize};

use crate::mechanics::{SkillTier, Stat, STAT_MAX};

/// The player's four skill counters, each kept within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStats")]
pub struct PlayerStats {
    creativity: u8,
    persuasion: u8,
    public_speaking: u8,
    research: u8,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::uniform(10)
    }
}

impl PlayerStats {
    /// Create stats from raw values, clamping each into range.
    pub fn new(creativity: i32, persuasion: i32, public_speaking: i32, research: i32) -> Self {
        Self {
            creativity: clamp_stat(creativity),
            persuasion: clamp_stat(persuasion),
            public_speaking: clamp_stat(public_speaking),
            research: clamp_stat(research),
        }
    }

    /// Every skill at the same value.
    pub fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn get(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Creativity => self.creativity,
            Stat::Persuasion => self.persuasion,
            Stat::PublicSpeaking => self.public_speaking,
            Stat::Research => self.research,
        }
    }

    /// Add `amount` to a skill and clamp into range.
    ///
    /// Returns the delta actually applied after clamping.
    pub fn modify(&mut self, stat: Stat, amount: i32) -> i32 {
        let slot = match stat {
            Stat::Creativity => &mut self.creativity,
            Stat::Persuasion => &mut self.persuasion,
            Stat::PublicSpeaking => &mut self.public_speaking,
            Stat::Research => &mut self.research,
        };
        let old = *slot;
        *slot = clamp_stat(i32::from(old).saturating_add(amount));
        i32::from(*slot) - i32::from(old)
    }

    pub fn tier(&self, stat: Stat) -> SkillTier {
        SkillTier::from_value(self.get(stat))
    }

    /// All skills with their values, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, u8)> + '_ {
        Stat::ALL.into_iter().map(move |stat| (stat, self.get(stat)))
    }
}

fn clamp_stat(value: i32) -> u8 {
    // Clamped into 0..=100, so the narrowing cast is lossless.
    value.clamp(0, i32::from(STAT_MAX)) as u8
}

/// Unclamped form accepted from configuration files.
#[derive(Deserialize)]
struct RawStats {
    #[serde(default = "default_stat")]
    creativity: i32,
    #[serde(default = "default_stat")]
    persuasion: i32,
    #[serde(default = "default_stat", alias = "publicSpeaking")]
    public_speaking: i32,
    #[serde(default = "default_stat")]
    research: i32,
}

fn default_stat() -> i32 {
    10
}

impl From<RawStats> for PlayerStats {
    fn from(raw: RawStats) -> Self {
        Self::new(
            raw.creativity,
            raw.persuasion,
            raw.public_speaking,
            raw.research,
        )
    }
}
