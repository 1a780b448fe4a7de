//! Serialisable read-only view of a session for UI binding.

use adventure_rules::{ItemId, MissionId, NodeId, ObjectiveStatus, SkillTier, Stat};
use serde::Serialize;

use super::{Session, SessionId};
use crate::dialogue::PresentedOption;

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub session: SessionId,
    pub dialogue: Option<DialogueView>,
    pub stats: Vec<StatView>,
    pub inventory: Vec<ItemView>,
    pub selected_item: Option<ItemId>,
    pub current_mission: Option<MissionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DialogueView {
    pub node: NodeId,
    pub step: u64,
    pub speaker: String,
    pub text: String,
    pub narrator_voice: bool,
    pub portrait: Option<String>,
    pub options: Vec<PresentedOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatView {
    pub stat: Stat,
    pub label: &'static str,
    pub value: u8,
    pub tier: SkillTier,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub usable: bool,
    pub sprite: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionView {
    pub id: MissionId,
    pub title: String,
    pub description: String,
    pub objectives: Vec<ObjectiveStatus>,
    pub completed: usize,
    pub total: usize,
}

impl Snapshot {
    pub(crate) fn capture(session: &Session) -> Self {
        let content = session.content();
        let state = session.state();

        let dialogue = session.current_node().and_then(|node| {
            Some(DialogueView {
                node: node.id.clone(),
                step: session.dialogue.current_step()?,
                speaker: node.speaker.clone(),
                text: node.text.clone(),
                narrator_voice: node.narrator_voice,
                portrait: node.portrait.clone(),
                options: session.presented_options(),
            })
        });

        let stats = state
            .stats()
            .iter()
            .map(|(stat, value)| StatView {
                stat,
                label: stat.label(),
                value,
                tier: SkillTier::from_value(value),
            })
            .collect();

        let inventory = state
            .inventory()
            .items()
            .filter_map(|id| content.item(id.as_str()))
            .map(|def| ItemView {
                id: def.id.clone(),
                name: def.name.clone(),
                description: def.description.clone(),
                usable: def.usable,
                sprite: def.sprite.clone(),
            })
            .collect();

        let current_mission = state
            .current_mission()
            .and_then(|id| content.mission(id.as_str()))
            .map(|def| {
                let objectives = state.missions().objectives(def);
                MissionView {
                    id: def.id.clone(),
                    title: def.title.clone(),
                    description: def.description.clone(),
                    completed: objectives.iter().filter(|o| o.completed).count(),
                    total: objectives.len(),
                    objectives,
                }
            });

        Self {
            session: session.id(),
            dialogue,
            stats,
            inventory,
            selected_item: state.selected_item().cloned(),
            current_mission,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
