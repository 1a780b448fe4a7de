//! The session facade - the only entry point the presentation layer needs.
//!
//! A `Session` owns one player's [`GameState`] and [`DialogueEngine`] and
//! shares read-only [`ContentTables`] with other sessions. Every operation
//! runs to completion inside the session's tracing span.

mod snapshot;

pub use snapshot::*;

use adventure_rules::content::DialogueNode;
use adventure_rules::{
    ContentError, ContentTables, GameEvent, GameState, ItemId, MissionId, ObjectiveId,
    ObjectiveStatus, PlayerStats,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, info_span, warn, Span};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::console::{Console, ConsoleReply, ConsoleScript, PendingReply};
use crate::dialogue::{Choice, DialogueEngine, PresentedOption, Selection};
use crate::error::DialogueError;

/// Identifies a session in logs and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One player's game.
pub struct Session {
    id: SessionId,
    config: EngineConfig,
    content: Arc<ContentTables>,
    state: GameState,
    dialogue: DialogueEngine,
    console: Console,
    span: Span,
}

impl Session {
    /// Create a session over already loaded content.
    ///
    /// Content is validated first. With `strict_content` any issue fails the
    /// session, otherwise issues are logged and play goes on.
    pub fn new(config: EngineConfig, content: Arc<ContentTables>) -> Result<Self, ContentError> {
        let id = SessionId::new();
        let span = info_span!("session", id = %id);
        let _entered = span.clone().entered();

        let issues = content.validate();
        if !issues.is_empty() {
            for issue in &issues {
                warn!(%issue, "content issue");
            }
            if config.strict_content {
                return Err(ContentError::Invalid(issues));
            }
        }

        let console = Console::new(Arc::new(ConsoleScript::builtin()?));

        info!("session created");
        Ok(Self {
            id,
            state: GameState::new(config.starting_stats),
            dialogue: DialogueEngine::new(config.history_limit),
            console,
            config,
            content,
            span,
        })
    }

    /// Create a session over the content shipped with the game.
    pub fn with_builtin_content(config: EngineConfig) -> Result<Self, ContentError> {
        Self::new(config, Arc::new(ContentTables::builtin()?))
    }

    /// Replace the console script, resetting the fallback rotation.
    pub fn with_console_script(mut self, script: Arc<ConsoleScript>) -> Self {
        self.console = Console::new(script);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn content(&self) -> &ContentTables {
        &self.content
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn dialogue(&self) -> &DialogueEngine {
        &self.dialogue
    }

    // === Dialogue ===

    /// Start a conversation at `node`.
    pub fn start_dialogue(&mut self, node: &str) -> Result<&DialogueNode, DialogueError> {
        let _entered = self.span.clone().entered();
        self.dialogue.start(&self.content, node)
    }

    /// Select a presented option.
    pub fn select_option(&mut self, choice: &Choice) -> Result<Selection, DialogueError> {
        let _entered = self.span.clone().entered();
        self.dialogue.select(&self.content, &mut self.state, choice)
    }

    /// Select an option of the current node by id, at the current step.
    ///
    /// The choice is built fresh, so a repeated click on a node that loops
    /// back to itself is accepted again. Input handlers should keep the
    /// [`Choice`] from [`Self::presented_options`] and call
    /// [`Self::select_option`], which rejects it once the node is left.
    pub fn select_option_by_id(&mut self, option: &str) -> Result<Selection, DialogueError> {
        let choice = self
            .dialogue
            .choice_for(option)
            .ok_or(DialogueError::NotInDialogue)?;
        self.select_option(&choice)
    }

    pub fn end_dialogue(&mut self) {
        let _entered = self.span.clone().entered();
        self.dialogue.end();
    }

    pub fn current_node(&self) -> Option<&DialogueNode> {
        self.dialogue.current_node(&self.content)
    }

    pub fn presented_options(&self) -> Vec<PresentedOption> {
        self.dialogue.present(&self.content, &self.state)
    }

    /// Talk to a character. Characters without dialogue return `None`.
    pub fn interact_with_character(
        &mut self,
        character: &str,
    ) -> Result<Option<&DialogueNode>, DialogueError> {
        let _entered = self.span.clone().entered();
        let def = self.content.character(character).ok_or_else(|| {
            warn!(character, "unknown character");
            DialogueError::UnknownCharacter(character.into())
        })?;

        match def.opening_dialogue() {
            Some(node) => self.dialogue.start(&self.content, node.as_str()).map(Some),
            None => Ok(None),
        }
    }

    /// Click a scene object. Objects without dialogue return `None`.
    pub fn interact_with_object(
        &mut self,
        object: &str,
    ) -> Result<Option<&DialogueNode>, DialogueError> {
        let _entered = self.span.clone().entered();
        let def = self.content.object(object).ok_or_else(|| {
            warn!(object, "unknown object");
            DialogueError::UnknownObject(object.into())
        })?;

        match &def.dialogue {
            Some(node) => self.dialogue.start(&self.content, node.as_str()).map(Some),
            None => Ok(None),
        }
    }

    // === Inventory ===

    pub fn use_item(&mut self, item: &str) -> Result<(), DialogueError> {
        let _entered = self.span.clone().entered();
        Ok(self.state.use_item(&self.content, item)?)
    }

    pub fn combine_items(&mut self, first: &str, second: &str) -> Result<(), DialogueError> {
        let _entered = self.span.clone().entered();
        Ok(self.state.combine_items(&self.content, first, second)?)
    }

    pub fn select_item(&mut self, item: &str) -> Result<(), DialogueError> {
        let _entered = self.span.clone().entered();
        Ok(self.state.select_item(item)?)
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.state.has_item(item)
    }

    pub fn inventory_items(&self) -> impl Iterator<Item = &ItemId> {
        self.state.inventory().items()
    }

    pub fn selected_item(&self) -> Option<&ItemId> {
        self.state.selected_item()
    }

    // === Missions ===

    pub fn start_mission(&mut self, mission: &str) -> Result<bool, DialogueError> {
        let _entered = self.span.clone().entered();
        Ok(self.state.start_mission(&self.content, mission)?)
    }

    pub fn complete_objective(
        &mut self,
        mission: &str,
        objective: &str,
    ) -> Result<bool, DialogueError> {
        let _entered = self.span.clone().entered();
        let objective = ObjectiveId::new(objective);
        Ok(self.state.complete_objective(&self.content, mission, &objective)?)
    }

    pub fn complete_mission(&mut self, mission: &str) -> Result<(), DialogueError> {
        let _entered = self.span.clone().entered();
        Ok(self.state.complete_mission(&self.content, mission)?)
    }

    pub fn current_mission(&self) -> Option<&MissionId> {
        self.state.current_mission()
    }

    pub fn is_mission_complete(&self, mission: &str) -> bool {
        self.state.is_mission_complete(mission)
    }

    pub fn is_objective_complete(&self, mission: &str, objective: &str) -> bool {
        self.state.is_objective_complete(mission, objective)
    }

    pub fn objectives(&self, mission: &str) -> Result<Vec<ObjectiveStatus>, DialogueError> {
        Ok(self.state.objectives(&self.content, mission)?)
    }

    // === Console ===

    pub fn console_greeting(&self) -> ConsoleReply {
        self.console.greeting()
    }

    /// Ask the console a question about the current mission or a marketing
    /// term. The reply is held back for the configured thinking delay.
    pub fn ask_console(&mut self, question: &str) -> Option<PendingReply> {
        let _entered = self.span.clone().entered();
        let mission = self
            .state
            .current_mission()
            .and_then(|id| self.content.mission(id.as_str()));
        let reply = self.console.reply(question, mission)?;
        Some(PendingReply::new(reply, self.config.thinking_delay()))
    }

    // === Queries ===

    pub fn stats(&self) -> &PlayerStats {
        self.state.stats()
    }

    /// Take the events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// A read-only view of everything the UI binds to.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("dialogue", self.dialogue.state())
            .field("current_mission", &self.state.current_mission())
            .finish_non_exhaustive()
    }
}
