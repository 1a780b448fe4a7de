//! Dialogue node definitions.

use serde::{Deserialize, Serialize};

use crate::entities::{ItemId, NodeId, OptionId};
use crate::mechanics::{Effect, StatRequirement};

/// One screen of narrative text plus the options the player can pick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: NodeId,
    pub speaker: String,
    pub text: String,

    /// Options in presentation order.
    #[serde(default, rename = "option")]
    pub options: Vec<DialogueOption>,

    /// Rendered in the console's own voice. No effect on rules.
    #[serde(default)]
    pub narrator_voice: bool,

    /// Portrait image, presentation only.
    #[serde(default)]
    pub portrait: Option<String>,
}

impl DialogueNode {
    pub fn new(id: impl Into<NodeId>, speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            speaker: speaker.into(),
            text: text.into(),
            options: Vec::new(),
            narrator_voice: false,
            portrait: None,
        }
    }

    pub fn with_option(mut self, option: DialogueOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_narrator_voice(mut self) -> Self {
        self.narrator_voice = true;
        self
    }

    pub fn option(&self, id: &str) -> Option<&DialogueOption> {
        self.options.iter().find(|o| o.id.as_str() == id)
    }
}

/// A selectable reply inside a dialogue node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueOption {
    pub id: OptionId,
    pub text: String,

    /// Node to continue with. Absent or empty ends the dialogue.
    #[serde(default)]
    pub next: Option<NodeId>,

    #[serde(default)]
    pub effect: Option<Effect>,

    #[serde(default)]
    pub requires_stat: Option<StatRequirement>,

    #[serde(default)]
    pub requires_item: Option<ItemId>,
}

impl DialogueOption {
    pub fn new(id: impl Into<OptionId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            next: None,
            effect: None,
            requires_stat: None,
            requires_item: None,
        }
    }

    pub fn with_next(mut self, next: impl Into<NodeId>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_stat_requirement(mut self, requirement: StatRequirement) -> Self {
        self.requires_stat = Some(requirement);
        self
    }

    pub fn with_item_requirement(mut self, item: impl Into<ItemId>) -> Self {
        self.requires_item = Some(item.into());
        self
    }

    /// The node this option leads to, treating an empty id as "end".
    pub fn next_node(&self) -> Option<&NodeId> {
        self.next.as_ref().filter(|id| !id.as_str().is_empty())
    }

    pub fn is_guarded(&self) -> bool {
        self.requires_stat.is_some() || self.requires_item.is_some()
    }
}
