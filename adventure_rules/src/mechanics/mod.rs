//! Game mechanics: skills, skill tiers, option requirements and effects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{ItemId, MissionId, ObjectiveId};

/// Upper bound of every skill value.
pub const STAT_MAX: u8 = 100;

/// The four marketing skills tracked for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Creativity,
    Persuasion,
    #[serde(alias = "publicSpeaking")]
    PublicSpeaking,
    Research,
}

impl Stat {
    pub const ALL: [Stat; 4] = [
        Stat::Creativity,
        Stat::Persuasion,
        Stat::PublicSpeaking,
        Stat::Research,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Stat::Creativity => "Creativity",
            Stat::Persuasion => "Persuasion",
            Stat::PublicSpeaking => "Public Speaking",
            Stat::Research => "Research",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse skill level shown next to a stat bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillTier {
    /// 0-33.
    Novice,
    /// 34-66.
    Competent,
    /// 67-100.
    Expert,
}

impl SkillTier {
    /// Get the tier for a skill value.
    pub fn from_value(value: u8) -> Self {
        match value {
            0..=33 => SkillTier::Novice,
            34..=66 => SkillTier::Competent,
            _ => SkillTier::Expert,
        }
    }
}

/// Minimum skill value an option requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRequirement {
    pub stat: Stat,
    pub min_value: u8,
}

impl StatRequirement {
    pub fn new(stat: Stat, min_value: u8) -> Self {
        Self { stat, min_value }
    }
}

/// A side effect attached to a dialogue option or an item use.
///
/// Applied exactly once by `GameState::apply_effect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    AddItem { item: ItemId },
    RemoveItem { item: ItemId },
    /// `amount` may be negative.
    ModifyStat { stat: Stat, amount: i32 },
    StartMission { mission: MissionId },
    CompleteMission { mission: MissionId },
    /// Binds to whichever mission is current when the effect fires.
    CompleteObjective { objective: ObjectiveId },
}

impl Effect {
    pub fn add_item(item: impl Into<ItemId>) -> Self {
        Effect::AddItem { item: item.into() }
    }

    pub fn remove_item(item: impl Into<ItemId>) -> Self {
        Effect::RemoveItem { item: item.into() }
    }

    pub fn modify_stat(stat: Stat, amount: i32) -> Self {
        Effect::ModifyStat { stat, amount }
    }

    pub fn start_mission(mission: impl Into<MissionId>) -> Self {
        Effect::StartMission {
            mission: mission.into(),
        }
    }

    pub fn complete_mission(mission: impl Into<MissionId>) -> Self {
        Effect::CompleteMission {
            mission: mission.into(),
        }
    }

    pub fn complete_objective(objective: impl Into<ObjectiveId>) -> Self {
        Effect::CompleteObjective {
            objective: objective.into(),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::AddItem { item } => write!(f, "add item {}", item),
            Effect::RemoveItem { item } => write!(f, "remove item {}", item),
            Effect::ModifyStat { stat, amount } => write!(f, "{} {:+}", stat, amount),
            Effect::StartMission { mission } => write!(f, "start mission {}", mission),
            Effect::CompleteMission { mission } => write!(f, "complete mission {}", mission),
            Effect::CompleteObjective { objective } => {
                write!(f, "complete objective {}", objective)
            }
        }
    }
}
