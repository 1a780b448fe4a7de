//! Characters and scene objects that open dialogues.

use serde::{Deserialize, Serialize};

use crate::entities::{CharacterId, NodeId, ObjectId};

/// A character the player can talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterDef {
    pub id: CharacterId,
    pub name: String,

    /// Dialogues this character can open. Talking starts the first one.
    #[serde(default)]
    pub dialogues: Vec<NodeId>,

    #[serde(default = "default_npc")]
    pub is_npc: bool,
}

fn default_npc() -> bool {
    true
}

impl CharacterDef {
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dialogues: Vec::new(),
            is_npc: true,
        }
    }

    pub fn with_dialogue(mut self, node: impl Into<NodeId>) -> Self {
        self.dialogues.push(node.into());
        self
    }

    pub fn opening_dialogue(&self) -> Option<&NodeId> {
        self.dialogues.first()
    }
}

/// A scene object, optionally opening a dialogue when clicked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDef {
    pub id: ObjectId,
    pub name: String,

    #[serde(default)]
    pub dialogue: Option<NodeId>,
}

impl ObjectDef {
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dialogue: None,
        }
    }

    pub fn with_dialogue(mut self, node: impl Into<NodeId>) -> Self {
        self.dialogue = Some(node.into());
        self
    }
}
