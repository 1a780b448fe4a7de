//! Item definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::entities::ItemId;
use crate::mechanics::Effect;

/// A catalog entry for an item the player can hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub description: String,

    /// Whether "use" is offered for this item.
    #[serde(default)]
    pub usable: bool,

    /// Effect applied through the regular effect dispatcher on use.
    #[serde(default)]
    pub use_effect: Option<Effect>,

    /// Message shown to the player on use.
    #[serde(default)]
    pub use_message: Option<String>,

    /// Items this one can be combined with (directional).
    #[serde(default)]
    pub combines_with: BTreeSet<ItemId>,

    /// Sprite key, presentation only.
    #[serde(default)]
    pub sprite: Option<String>,
}

impl ItemDef {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            usable: false,
            use_effect: None,
            use_message: None,
            combines_with: BTreeSet::new(),
            sprite: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Make the item usable with the given effect.
    pub fn with_use_effect(mut self, effect: Effect) -> Self {
        self.usable = true;
        self.use_effect = Some(effect);
        self
    }

    pub fn with_use_message(mut self, message: impl Into<String>) -> Self {
        self.use_message = Some(message.into());
        self
    }

    pub fn with_combination(mut self, other: impl Into<ItemId>) -> Self {
        self.combines_with.insert(other.into());
        self
    }

    pub fn can_combine_with(&self, other: &ItemId) -> bool {
        self.combines_with.contains(other)
    }
}
