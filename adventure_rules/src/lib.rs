//! # Adventure Rules
//!
//! Rules of the adventure: identifiers, skills and effects, the content
//! catalogs, and the player state those catalogs act on.
//!
//! Nothing here knows about dialogue flow. The narrative engine drives these
//! rules through [`GameState::apply_effect`] and the public mutations of
//! [`GameState`].

pub mod content;
pub mod entities;
pub mod error;
pub mod mechanics;
pub mod missions;
pub mod world_state;

pub use content::{ContentIssue, ContentSources, ContentTables};
pub use entities::*;
pub use error::{ContentError, RuleError};
pub use mechanics::*;
pub use missions::{MissionLog, MissionStatus, ObjectiveStatus};
pub use world_state::*;
