//! The player's held items.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ItemId;
use crate::content::ItemDef;
use crate::error::RuleError;

/// Items the player holds, plus the item currently being examined.
///
/// Holding is a set: acquiring an item twice keeps one copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    held: BTreeSet<ItemId>,
    selected: Option<ItemId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item. Returns false if it was already held.
    pub fn add(&mut self, item: ItemId) -> bool {
        self.held.insert(item)
    }

    /// Remove an item. Returns false if it was not held.
    ///
    /// Removing the selected item clears the selection.
    pub fn remove(&mut self, item: &str) -> bool {
        let removed = self.held.remove(item);
        if removed && self.selected.as_ref().map(ItemId::as_str) == Some(item) {
            self.selected = None;
        }
        removed
    }

    pub fn has(&self, item: &str) -> bool {
        self.held.contains(item)
    }

    /// Held items in id order.
    pub fn items(&self) -> impl Iterator<Item = &ItemId> {
        self.held.iter()
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    pub fn selected(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    /// Select a held item for examination.
    pub fn select(&mut self, item: &str) -> Result<(), RuleError> {
        match self.held.get(item) {
            Some(held) => {
                self.selected = Some(held.clone());
                Ok(())
            }
            None => Err(RuleError::ItemNotHeld(ItemId::new(item))),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Check whether `first` can be combined with `second`.
    ///
    /// The selection is cleared whatever the outcome; held items never change.
    pub fn combine(&mut self, first: &ItemDef, second: &ItemDef) -> Result<(), RuleError> {
        self.clear_selection();

        for item in [&first.id, &second.id] {
            if !self.has(item.as_str()) {
                return Err(RuleError::ItemNotHeld(item.clone()));
            }
        }

        if first.can_combine_with(&second.id) {
            Ok(())
        } else {
            Err(RuleError::CannotCombine {
                first: first.id.clone(),
                second: second.id.clone(),
            })
        }
    }
}
