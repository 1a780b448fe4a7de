//! Content tables - the read-only catalogs the rules run against.
//!
//! Dialogue nodes, items, missions and the cast each live in their own
//! namespace. Tables are parsed from TOML and checked for dangling references
//! at load time so a typo in content surfaces before play, not as a silently
//! ignored lookup during it.

mod cast;
mod dialogue;
mod item;
mod mission;

pub use cast::*;
pub use dialogue::*;
pub use item::*;
pub use mission::*;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use thiserror::Error;
use tracing::{info, warn};

use crate::entities::{CharacterId, ItemId, MissionId, NodeId, ObjectId, ObjectiveId, OptionId};
use crate::error::ContentError;
use crate::mechanics::Effect;

/// Raw TOML text for each content file.
#[derive(Debug, Clone, Copy)]
pub struct ContentSources<'a> {
    pub dialogues: &'a str,
    pub items: &'a str,
    pub missions: &'a str,
    pub cast: &'a str,
}

impl ContentSources<'static> {
    /// The content shipped with the game.
    pub fn builtin() -> Self {
        Self {
            dialogues: include_str!("../../content/dialogues.toml"),
            items: include_str!("../../content/items.toml"),
            missions: include_str!("../../content/missions.toml"),
            cast: include_str!("../../content/cast.toml"),
        }
    }
}

#[derive(Deserialize)]
struct DialogueFile {
    #[serde(default)]
    node: Vec<DialogueNode>,
}

#[derive(Deserialize)]
struct ItemFile {
    #[serde(default)]
    item: Vec<ItemDef>,
}

#[derive(Deserialize)]
struct MissionFile {
    #[serde(default)]
    mission: Vec<MissionDef>,
}

#[derive(Deserialize)]
struct CastFile {
    #[serde(default)]
    character: Vec<CharacterDef>,
    #[serde(default)]
    object: Vec<ObjectDef>,
}

/// All static game content, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct ContentTables {
    nodes: BTreeMap<NodeId, DialogueNode>,
    items: BTreeMap<ItemId, ItemDef>,
    missions: BTreeMap<MissionId, MissionDef>,
    characters: BTreeMap<CharacterId, CharacterDef>,
    objects: BTreeMap<ObjectId, ObjectDef>,
}

impl ContentTables {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the content shipped with the game.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_sources(&ContentSources::builtin())
    }

    /// Parse content files. Duplicate ids within a namespace are rejected.
    ///
    /// References between tables are not checked here; see [`Self::validate`].
    pub fn from_sources(sources: &ContentSources<'_>) -> Result<Self, ContentError> {
        let dialogues: DialogueFile = parse("dialogues", sources.dialogues)?;
        let items: ItemFile = parse("items", sources.items)?;
        let missions: MissionFile = parse("missions", sources.missions)?;
        let cast: CastFile = parse("cast", sources.cast)?;

        let mut tables = Self::new();
        for node in dialogues.node {
            insert_unique(&mut tables.nodes, "dialogue node", node.id.clone(), node)?;
        }
        for item in items.item {
            insert_unique(&mut tables.items, "item", item.id.clone(), item)?;
        }
        for mission in missions.mission {
            insert_unique(&mut tables.missions, "mission", mission.id.clone(), mission)?;
        }
        for character in cast.character {
            insert_unique(&mut tables.characters, "character", character.id.clone(), character)?;
        }
        for object in cast.object {
            insert_unique(&mut tables.objects, "object", object.id.clone(), object)?;
        }

        info!(
            nodes = tables.nodes.len(),
            items = tables.items.len(),
            missions = tables.missions.len(),
            characters = tables.characters.len(),
            objects = tables.objects.len(),
            "loaded content tables"
        );

        Ok(tables)
    }

    /// Add or replace a dialogue node.
    pub fn with_node(mut self, node: DialogueNode) -> Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    /// Add or replace an item.
    pub fn with_item(mut self, item: ItemDef) -> Self {
        self.items.insert(item.id.clone(), item);
        self
    }

    /// Add or replace a mission.
    pub fn with_mission(mut self, mission: MissionDef) -> Self {
        self.missions.insert(mission.id.clone(), mission);
        self
    }

    pub fn with_character(mut self, character: CharacterDef) -> Self {
        self.characters.insert(character.id.clone(), character);
        self
    }

    pub fn with_object(mut self, object: ObjectDef) -> Self {
        self.objects.insert(object.id.clone(), object);
        self
    }

    pub fn node(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn mission(&self, id: &str) -> Option<&MissionDef> {
        self.missions.get(id)
    }

    pub fn character(&self, id: &str) -> Option<&CharacterDef> {
        self.characters.get(id)
    }

    pub fn object(&self, id: &str) -> Option<&ObjectDef> {
        self.objects.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DialogueNode> {
        self.nodes.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    pub fn missions(&self) -> impl Iterator<Item = &MissionDef> {
        self.missions.values()
    }

    pub fn characters(&self) -> impl Iterator<Item = &CharacterDef> {
        self.characters.values()
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectDef> {
        self.objects.values()
    }

    /// Check every cross-table reference.
    ///
    /// Returns the issues found, in a stable order. An empty list means the
    /// content is consistent.
    pub fn validate(&self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();

        for node in self.nodes.values() {
            let mut seen: Vec<&OptionId> = Vec::new();
            for option in &node.options {
                if seen.contains(&&option.id) {
                    issues.push(ContentIssue::DuplicateOption {
                        node: node.id.clone(),
                        option: option.id.clone(),
                    });
                }
                seen.push(&option.id);

                if let Some(target) = option.next_node() {
                    if !self.nodes.contains_key(target) {
                        issues.push(ContentIssue::DanglingNext {
                            node: node.id.clone(),
                            option: option.id.clone(),
                            target: target.clone(),
                        });
                    }
                }

                let context = format!("option '{}' of node '{}'", option.id, node.id);
                if let Some(item) = &option.requires_item {
                    self.check_item(&context, item, &mut issues);
                }
                if let Some(effect) = &option.effect {
                    self.check_effect(&context, effect, &mut issues);
                }
            }
        }

        for item in self.items.values() {
            let context = format!("item '{}'", item.id);
            if let Some(effect) = &item.use_effect {
                self.check_effect(&context, effect, &mut issues);
            }
            for other in &item.combines_with {
                self.check_item(&context, other, &mut issues);
            }
        }

        for mission in self.missions.values() {
            let mut seen: Vec<&ObjectiveId> = Vec::new();
            for objective in &mission.objectives {
                if seen.contains(&&objective.id) {
                    issues.push(ContentIssue::DuplicateObjective {
                        mission: mission.id.clone(),
                        objective: objective.id.clone(),
                    });
                }
                seen.push(&objective.id);
            }

            let context = format!("reward of mission '{}'", mission.id);
            for item in &mission.reward.items {
                self.check_item(&context, item, &mut issues);
            }
        }

        for character in self.characters.values() {
            let context = format!("character '{}'", character.id);
            for node in &character.dialogues {
                self.check_dialogue(&context, node, &mut issues);
            }
        }

        for object in self.objects.values() {
            if let Some(node) = &object.dialogue {
                let context = format!("object '{}'", object.id);
                self.check_dialogue(&context, node, &mut issues);
            }
        }

        issues
    }

    /// Validate and return the tables only if no issue was found.
    pub fn validated(self) -> Result<Self, ContentError> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(self)
        } else {
            for issue in &issues {
                warn!(%issue, "content issue");
            }
            Err(ContentError::Invalid(issues))
        }
    }

    fn check_effect(&self, context: &str, effect: &Effect, issues: &mut Vec<ContentIssue>) {
        match effect {
            Effect::AddItem { item } | Effect::RemoveItem { item } => {
                self.check_item(context, item, issues);
            }
            Effect::ModifyStat { .. } => {}
            Effect::StartMission { mission } | Effect::CompleteMission { mission } => {
                if !self.missions.contains_key(mission) {
                    issues.push(ContentIssue::UnknownMission {
                        context: context.to_string(),
                        mission: mission.clone(),
                    });
                }
            }
            Effect::CompleteObjective { objective } => {
                // The owning mission is only known at runtime, so any
                // mission declaring the objective is enough.
                if !self.missions.values().any(|m| m.has_objective(objective)) {
                    issues.push(ContentIssue::UnknownObjective {
                        context: context.to_string(),
                        objective: objective.clone(),
                    });
                }
            }
        }
    }

    fn check_item(&self, context: &str, item: &ItemId, issues: &mut Vec<ContentIssue>) {
        if !self.items.contains_key(item) {
            issues.push(ContentIssue::UnknownItem {
                context: context.to_string(),
                item: item.clone(),
            });
        }
    }

    fn check_dialogue(&self, context: &str, node: &NodeId, issues: &mut Vec<ContentIssue>) {
        if !self.nodes.contains_key(node) {
            issues.push(ContentIssue::UnknownDialogue {
                context: context.to_string(),
                node: node.clone(),
            });
        }
    }
}

/// A broken reference or duplicate found by [`ContentTables::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentIssue {
    #[error("option '{option}' of node '{node}' leads to unknown node '{target}'")]
    DanglingNext {
        node: NodeId,
        option: OptionId,
        target: NodeId,
    },

    #[error("{context} references unknown item '{item}'")]
    UnknownItem { context: String, item: ItemId },

    #[error("{context} references unknown mission '{mission}'")]
    UnknownMission { context: String, mission: MissionId },

    #[error("{context} completes objective '{objective}' that no mission declares")]
    UnknownObjective {
        context: String,
        objective: ObjectiveId,
    },

    #[error("{context} opens unknown node '{node}'")]
    UnknownDialogue { context: String, node: NodeId },

    #[error("node '{node}' declares option '{option}' more than once")]
    DuplicateOption { node: NodeId, option: OptionId },

    #[error("mission '{mission}' declares objective '{objective}' more than once")]
    DuplicateObjective {
        mission: MissionId,
        objective: ObjectiveId,
    },
}

fn parse<T: DeserializeOwned>(file: &'static str, text: &str) -> Result<T, ContentError> {
    toml::from_str(text).map_err(|source| ContentError::Parse { file, source })
}

fn insert_unique<K, V>(
    map: &mut BTreeMap<K, V>,
    namespace: &'static str,
    key: K,
    value: V,
) -> Result<(), ContentError>
where
    K: Ord + Display,
{
    if map.contains_key(&key) {
        return Err(ContentError::DuplicateId {
            namespace,
            id: key.to_string(),
        });
    }
    map.insert(key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::Stat;

    fn sources<'a>(dialogues: &'a str, items: &'a str, missions: &'a str) -> ContentSources<'a> {
        ContentSources {
            dialogues,
            items,
            missions,
            cast: "",
        }
    }

    #[test]
    fn test_builtin_content_is_consistent() {
        let tables = ContentTables::builtin().unwrap();
        assert_eq!(tables.validate(), Vec::new());

        assert!(tables.node("intro_1").is_some());
        assert!(tables.item("marc_access_card").is_some());
        assert!(tables.mission("market_orientation").is_some());
        assert!(tables.character("professor").is_some());
        assert!(tables.object("whiteboard").is_some());
    }

    #[test]
    fn test_builtin_coffee_uses_stat_effect() {
        let tables = ContentTables::builtin().unwrap();
        let coffee = tables.item("coffee").unwrap();
        assert!(coffee.usable);
        assert_eq!(
            coffee.use_effect,
            Some(Effect::modify_stat(Stat::PublicSpeaking, 5))
        );
    }

    #[test]
    fn test_parse_nodes_with_options() {
        let tables = ContentTables::from_sources(&sources(
            r#"
            [[node]]
            id = "whiteboard_2"
            speaker = "You"
            text = "The chart is labeled 'Key Performance Indicators'."

            [[node.option]]
            id = "whiteboard_2_1"
            text = "Take a photo as evidence"
            next = ""
            effect = { type = "add_item", item = "whiteboard_photo" }

            [[node.option]]
            id = "whiteboard_2_2"
            text = "Leave it"
            "#,
            "",
            "",
        ))
        .unwrap();

        let node = tables.node("whiteboard_2").unwrap();
        assert_eq!(node.options.len(), 2);
        assert_eq!(
            node.options[0].effect,
            Some(Effect::add_item("whiteboard_photo"))
        );
        assert!(node.options[0].next_node().is_none());
        assert!(node.options[1].effect.is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected_within_namespace() {
        let result = ContentTables::from_sources(&sources(
            "",
            r#"
            [[item]]
            id = "coffee"
            name = "Cup of Coffee"
            description = "Burnt."

            [[item]]
            id = "coffee"
            name = "Another Coffee"
            description = "Also burnt."
            "#,
            "",
        ));

        match result {
            Err(ContentError::DuplicateId { namespace, id }) => {
                assert_eq!(namespace, "item");
                assert_eq!(id, "coffee");
            }
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn test_same_id_across_namespaces_is_allowed() {
        let tables = ContentTables::from_sources(&sources(
            r#"
            [[node]]
            id = "coffee"
            speaker = "You"
            text = "A coffee machine."
            "#,
            r#"
            [[item]]
            id = "coffee"
            name = "Cup of Coffee"
            description = "Burnt."
            "#,
            r#"
            [[mission]]
            id = "coffee"
            title = "Get coffee"
            description = "Caffeine."
            "#,
        ))
        .unwrap();

        assert!(tables.node("coffee").is_some());
        assert!(tables.item("coffee").is_some());
        assert!(tables.mission("coffee").is_some());
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = ContentTables::from_sources(&sources("", "[[item]]\nid = ", "")).unwrap_err();
        assert!(matches!(err, ContentError::Parse { file: "items", .. }));
    }

    #[test]
    fn test_validate_reports_dangling_references() {
        let tables = ContentTables::new()
            .with_node(
                DialogueNode::new("start", "You", "Hello")
                    .with_option(DialogueOption::new("a", "Go").with_next("nowhere"))
                    .with_option(
                        DialogueOption::new("b", "Take")
                            .with_effect(Effect::add_item("ghost_item")),
                    )
                    .with_option(
                        DialogueOption::new("c", "Finish")
                            .with_effect(Effect::complete_objective("prepare_report")),
                    ),
            )
            .with_mission(
                MissionDef::new("m", "Mission")
                    .with_objective("prepare-report", "Prepare")
                    .with_reward(Reward::default().with_item("trophy")),
            )
            .with_object(ObjectDef::new("printer", "Printer").with_dialogue("missing"));

        let issues = tables.validate();
        assert_eq!(issues.len(), 4);
        assert!(issues.iter().any(|i| matches!(
            i,
            ContentIssue::DanglingNext { target, .. } if target.as_str() == "nowhere"
        )));
        assert!(issues.iter().any(|i| matches!(
            i,
            ContentIssue::UnknownItem { item, .. } if item.as_str() == "ghost_item"
        )));
        assert!(issues.iter().any(|i| matches!(
            i,
            ContentIssue::UnknownItem { item, .. } if item.as_str() == "trophy"
        )));
        assert!(issues.iter().any(|i| matches!(
            i,
            ContentIssue::UnknownDialogue { node, .. } if node.as_str() == "missing"
        )));

        assert!(matches!(
            tables.validated(),
            Err(ContentError::Invalid(found)) if found.len() == 4
        ));
    }

    #[test]
    fn test_validate_flags_unknown_objective() {
        let tables = ContentTables::new()
            .with_node(
                DialogueNode::new("start", "You", "Hello").with_option(
                    DialogueOption::new("a", "Done")
                        .with_effect(Effect::complete_objective("write-poem")),
                ),
            )
            .with_mission(
                MissionDef::new("m", "Mission").with_objective("prepare-report", "Prepare"),
            );

        let issues = tables.validate();
        assert_eq!(
            issues,
            vec![ContentIssue::UnknownObjective {
                context: "option 'a' of node 'start'".to_string(),
                objective: ObjectiveId::new("write-poem"),
            }]
        );
    }

    #[test]
    fn test_validate_flags_duplicate_objectives_and_options() {
        let tables = ContentTables::new()
            .with_node(
                DialogueNode::new("start", "You", "Hello")
                    .with_option(DialogueOption::new("a", "One"))
                    .with_option(DialogueOption::new("a", "Two")),
            )
            .with_mission(
                MissionDef::new("m", "Mission")
                    .with_objective("prepare-report", "Prepare")
                    .with_objective("prepare_report", "Prepare again"),
            );

        let issues = tables.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| matches!(i, ContentIssue::DuplicateOption { .. })));
        assert!(issues.iter().any(|i| matches!(i, ContentIssue::DuplicateObjective { .. })));
    }
}
