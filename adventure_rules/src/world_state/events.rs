//! Notifications produced by state mutations.

use serde::{Deserialize, Serialize};

use crate::entities::{ItemId, MissionId, ObjectiveId};
use crate::mechanics::Stat;

/// Something the presentation layer may want to react to.
///
/// Events are queued by [`super::GameState`] and drained by the caller. A
/// mutation that changes nothing queues nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    ItemAcquired {
        item: ItemId,
        name: String,
    },
    ItemRemoved {
        item: ItemId,
    },
    StatChanged {
        stat: Stat,
        from: u8,
        to: u8,
    },
    MissionStarted {
        mission: MissionId,
        title: String,
    },
    ObjectiveCompleted {
        mission: MissionId,
        objective: ObjectiveId,
    },
    MissionCompleted {
        mission: MissionId,
        title: String,
    },
    ItemUsed {
        item: ItemId,
    },
    ItemsCombined {
        first: ItemId,
        second: ItemId,
    },
    /// Text to show the player as-is.
    Notice {
        message: String,
    },
}

impl GameEvent {
    pub fn notice(message: impl Into<String>) -> Self {
        GameEvent::Notice {
            message: message.into(),
        }
    }

    /// Event type as string (for logging).
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::ItemAcquired { .. } => "item_acquired",
            GameEvent::ItemRemoved { .. } => "item_removed",
            GameEvent::StatChanged { .. } => "stat_changed",
            GameEvent::MissionStarted { .. } => "mission_started",
            GameEvent::ObjectiveCompleted { .. } => "objective_completed",
            GameEvent::MissionCompleted { .. } => "mission_completed",
            GameEvent::ItemUsed { .. } => "item_used",
            GameEvent::ItemsCombined { .. } => "items_combined",
            GameEvent::Notice { .. } => "notice",
        }
    }
}
