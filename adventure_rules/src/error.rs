//! Error types for rule operations and content loading.

use thiserror::Error;

use crate::entities::{ItemId, MissionId, ObjectiveId};

/// A rejected mutation of player state.
///
/// Every variant is recoverable: the state was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),

    #[error("unknown mission '{0}'")]
    UnknownMission(MissionId),

    #[error("mission '{mission}' has no objective '{objective}'")]
    UnknownObjective {
        mission: MissionId,
        objective: ObjectiveId,
    },

    #[error("no mission is currently active")]
    NoCurrentMission,

    #[error("mission '{0}' is already completed")]
    MissionAlreadyCompleted(MissionId),

    #[error("item '{0}' is not in the inventory")]
    ItemNotHeld(ItemId),

    #[error("item '{0}' cannot be used")]
    ItemNotUsable(ItemId),

    #[error("item '{first}' cannot be combined with '{second}'")]
    CannotCombine { first: ItemId, second: ItemId },
}

/// Failure to load content tables.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: toml::de::Error,
    },

    #[error("duplicate {namespace} id '{id}'")]
    DuplicateId { namespace: &'static str, id: String },

    #[error("content failed validation with {} issue(s)", .0.len())]
    Invalid(Vec<crate::content::ContentIssue>),
}
