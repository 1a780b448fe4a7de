//! Mission definitions.

use serde::{Deserialize, Serialize};

use crate::entities::{ItemId, MissionId, ObjectiveId};
use crate::mechanics::Stat;

/// A catalog entry for a mission and its ordered objectives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionDef {
    pub id: MissionId,
    pub title: String,
    pub description: String,

    #[serde(default, rename = "objective")]
    pub objectives: Vec<ObjectiveDef>,

    #[serde(default)]
    pub reward: Reward,
}

impl MissionDef {
    pub fn new(id: impl Into<MissionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            objectives: Vec::new(),
            reward: Reward::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_objective(
        mut self,
        id: impl Into<ObjectiveId>,
        description: impl Into<String>,
    ) -> Self {
        self.objectives.push(ObjectiveDef {
            id: id.into(),
            description: description.into(),
        });
        self
    }

    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.reward = reward;
        self
    }

    pub fn objective(&self, id: &ObjectiveId) -> Option<&ObjectiveDef> {
        self.objectives.iter().find(|o| &o.id == id)
    }

    pub fn has_objective(&self, id: &ObjectiveId) -> bool {
        self.objective(id).is_some()
    }
}

/// A single sub-goal of a mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveDef {
    pub id: ObjectiveId,
    pub description: String,
}

/// Granted once when a mission completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(default)]
    pub stats: StatDeltas,

    #[serde(default)]
    pub items: Vec<ItemId>,
}

impl Reward {
    pub fn with_stat(mut self, stat: Stat, amount: i32) -> Self {
        self.stats.set(stat, amount);
        self
    }

    pub fn with_item(mut self, item: impl Into<ItemId>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty() && self.items.is_empty()
    }
}

/// Per-skill deltas; unset skills are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDeltas {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creativity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persuasion: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "publicSpeaking")]
    pub public_speaking: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<i32>,
}

impl StatDeltas {
    pub fn get(&self, stat: Stat) -> Option<i32> {
        match stat {
            Stat::Creativity => self.creativity,
            Stat::Persuasion => self.persuasion,
            Stat::PublicSpeaking => self.public_speaking,
            Stat::Research => self.research,
        }
    }

    pub fn set(&mut self, stat: Stat, amount: i32) {
        let slot = match stat {
            Stat::Creativity => &mut self.creativity,
            Stat::Persuasion => &mut self.persuasion,
            Stat::PublicSpeaking => &mut self.public_speaking,
            Stat::Research => &mut self.research,
        };
        *slot = Some(amount);
    }

    /// Set deltas in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        Stat::ALL
            .into_iter()
            .filter_map(move |stat| self.get(stat).map(|amount| (stat, amount)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
