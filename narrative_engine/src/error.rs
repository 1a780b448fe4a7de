//! Error types for dialogue navigation and engine configuration.

use adventure_rules::{CharacterId, NodeId, ObjectId, OptionId, RuleError};
use thiserror::Error;

use crate::dialogue::GuardFailure;

/// A rejected dialogue or session operation.
///
/// The engine has already fallen back to a safe state when this is returned:
/// navigation errors leave the conversation where it was (or idle), rule
/// errors leave the player state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogueError {
    #[error("unknown dialogue node '{0}'")]
    UnknownNode(NodeId),

    #[error("node '{node}' has no option '{option}'")]
    UnknownOption { node: NodeId, option: OptionId },

    #[error("no dialogue is active")]
    NotInDialogue,

    #[error("choice for node '{node}' at step {step} is stale")]
    StaleChoice { node: NodeId, step: u64 },

    #[error("option '{option}' is not available: {reason}")]
    GuardNotSatisfied { option: OptionId, reason: GuardFailure },

    #[error("unknown character '{0}'")]
    UnknownCharacter(CharacterId),

    #[error("unknown object '{0}'")]
    UnknownObject(ObjectId),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Failure to read an [`crate::EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("history limit must be at least 1")]
    ZeroHistoryLimit,
}
