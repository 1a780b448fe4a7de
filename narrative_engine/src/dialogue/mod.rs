//! Dialogue state machine.
//!
//! The engine is either idle or showing one node. Selecting an option runs
//! in a fixed order:
//!
//! 1. Re-check the option's guards against the state *before* the effect
//! 2. Apply the option's effect once through [`GameState::apply_effect`]
//! 3. Move to the next node, or go idle if there is none
//!
//! Every entry into a node gets a fresh step number. Choices carry the step
//! they were presented at, so a second click on a node the engine already
//! left is recognised and rejected.

pub mod guard;

pub use guard::GuardFailure;

use adventure_rules::content::DialogueNode;
use adventure_rules::{ContentTables, Effect, GameState, NodeId, OptionId, RuleError};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

use crate::error::DialogueError;

/// Where the engine is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DialogueState {
    Idle,
    Active { node: NodeId, step: u64 },
}

/// A selection handle for one option of one presentation of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub step: u64,
    pub node: NodeId,
    pub option: OptionId,
}

/// An option as offered to the player.
///
/// `available` is advisory. The engine checks guards again on selection.
#[derive(Debug, Clone, Serialize)]
pub struct PresentedOption {
    pub choice: Choice,
    pub text: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<GuardFailure>,
}

/// Why a conversation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The option had no next node.
    Terminal,
    /// The option pointed at a node that does not exist.
    UnknownNext(NodeId),
}

/// What a selection did to the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Advanced(NodeId),
    Ended(EndReason),
}

/// Outcome of an accepted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub option: OptionId,
    pub effect: Option<Effect>,
    /// Set when the effect was rejected. The transition still happened.
    pub effect_error: Option<RuleError>,
    pub transition: Transition,
}

impl Selection {
    pub fn ended(&self) -> bool {
        matches!(self.transition, Transition::Ended(_))
    }
}

/// Drives one conversation at a time over a [`ContentTables`] graph.
#[derive(Debug, Clone)]
pub struct DialogueEngine {
    state: DialogueState,
    last_step: u64,
    history: VecDeque<NodeId>,
    history_limit: usize,
}

impl Default for DialogueEngine {
    fn default() -> Self {
        Self::new(64)
    }
}

impl DialogueEngine {
    /// Create an idle engine remembering up to `history_limit` nodes.
    pub fn new(history_limit: usize) -> Self {
        Self {
            state: DialogueState::Idle,
            last_step: 0,
            history: VecDeque::new(),
            history_limit: history_limit.max(1),
        }
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DialogueState::Active { .. })
    }

    pub fn current_node_id(&self) -> Option<&NodeId> {
        match &self.state {
            DialogueState::Active { node, .. } => Some(node),
            DialogueState::Idle => None,
        }
    }

    pub fn current_step(&self) -> Option<u64> {
        match &self.state {
            DialogueState::Active { step, .. } => Some(*step),
            DialogueState::Idle => None,
        }
    }

    pub fn current_node<'c>(&self, content: &'c ContentTables) -> Option<&'c DialogueNode> {
        self.current_node_id()
            .and_then(|id| content.node(id.as_str()))
    }

    /// Nodes visited in the current conversation, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &NodeId> {
        self.history.iter()
    }

    /// Start a conversation at `node`.
    ///
    /// An active conversation is replaced. An unknown node leaves the engine
    /// as it was.
    pub fn start<'c>(
        &mut self,
        content: &'c ContentTables,
        node: &str,
    ) -> Result<&'c DialogueNode, DialogueError> {
        let Some(def) = content.node(node) else {
            warn!(node, "cannot start unknown dialogue node");
            return Err(DialogueError::UnknownNode(NodeId::new(node)));
        };

        if let Some(previous) = self.current_node_id() {
            debug!(%previous, "replacing active conversation");
        }
        self.history.clear();
        self.enter(&def.id);
        info!(node = %def.id, "dialogue started");
        Ok(def)
    }

    /// Go idle.
    pub fn end(&mut self) {
        if let Some(node) = self.current_node_id() {
            info!(%node, "dialogue ended");
        }
        self.state = DialogueState::Idle;
    }

    /// The current node's options in declared order, with availability.
    pub fn present(&self, content: &ContentTables, state: &GameState) -> Vec<PresentedOption> {
        let DialogueState::Active { node, step } = &self.state else {
            return Vec::new();
        };
        let Some(def) = content.node(node.as_str()) else {
            return Vec::new();
        };

        def.options
            .iter()
            .map(|option| {
                let blocked_by = guard::check(option, state).err();
                PresentedOption {
                    choice: Choice {
                        step: *step,
                        node: node.clone(),
                        option: option.id.clone(),
                    },
                    text: option.text.clone(),
                    available: blocked_by.is_none(),
                    blocked_by,
                }
            })
            .collect()
    }

    /// A choice for an option of the current node at the current step.
    pub fn choice_for(&self, option: &str) -> Option<Choice> {
        match &self.state {
            DialogueState::Active { node, step } => Some(Choice {
                step: *step,
                node: node.clone(),
                option: OptionId::new(option),
            }),
            DialogueState::Idle => None,
        }
    }

    /// Select an option.
    ///
    /// Rejected selections change nothing. An accepted selection always
    /// transitions, even when its effect is rejected; the rejection is
    /// reported in [`Selection::effect_error`].
    pub fn select(
        &mut self,
        content: &ContentTables,
        state: &mut GameState,
        choice: &Choice,
    ) -> Result<Selection, DialogueError> {
        let (node, step) = match &self.state {
            DialogueState::Active { node, step } => (node.clone(), *step),
            DialogueState::Idle => {
                debug!(option = %choice.option, "selection while idle ignored");
                return Err(DialogueError::NotInDialogue);
            }
        };

        if choice.step != step || choice.node != node {
            warn!(
                node = %choice.node,
                step = choice.step,
                current_step = step,
                "stale choice rejected"
            );
            return Err(DialogueError::StaleChoice {
                node: choice.node.clone(),
                step: choice.step,
            });
        }

        let Some(def) = content.node(node.as_str()) else {
            warn!(%node, "active node vanished from content");
            self.state = DialogueState::Idle;
            return Err(DialogueError::UnknownNode(node));
        };

        let Some(option) = def.option(choice.option.as_str()) else {
            warn!(%node, option = %choice.option, "unknown option");
            return Err(DialogueError::UnknownOption {
                node,
                option: choice.option.clone(),
            });
        };

        if let Err(reason) = guard::check(option, state) {
            warn!(%node, option = %option.id, %reason, "guard not satisfied");
            return Err(DialogueError::GuardNotSatisfied {
                option: option.id.clone(),
                reason,
            });
        }

        debug!(%node, option = %option.id, "option selected");

        let effect_error = option
            .effect
            .as_ref()
            .and_then(|effect| state.apply_effect(content, effect).err());
        if let Some(err) = &effect_error {
            warn!(%node, option = %option.id, %err, "option effect rejected");
        }

        let transition = match option.next_node() {
            Some(next) if content.node(next.as_str()).is_some() => {
                self.enter(next);
                debug!(from = %node, to = %next, "dialogue advanced");
                Transition::Advanced(next.clone())
            }
            Some(next) => {
                warn!(from = %node, to = %next, "next node unknown, ending dialogue");
                self.end();
                Transition::Ended(EndReason::UnknownNext(next.clone()))
            }
            None => {
                self.end();
                Transition::Ended(EndReason::Terminal)
            }
        };

        Ok(Selection {
            option: option.id.clone(),
            effect: option.effect.clone(),
            effect_error,
            transition,
        })
    }

    fn enter(&mut self, node: &NodeId) {
        self.last_step += 1;
        self.state = DialogueState::Active {
            node: node.clone(),
            step: self.last_step,
        };

        self.history.push_back(node.clone());
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_rules::content::{DialogueOption, ItemDef, MissionDef};
    use adventure_rules::{ObjectiveId, PlayerStats, Stat, StatRequirement};

    fn content() -> ContentTables {
        ContentTables::new()
            .with_item(ItemDef::new("marc_access_card", "M.A.R.C. Access Card"))
            .with_item(ItemDef::new("internal_memo", "Internal Memo"))
            .with_mission(
                MissionDef::new("market_orientation", "Marketing Orientation Analysis")
                    .with_objective("meet-client", "Meet with the CEO"),
            )
            .with_node(
                DialogueNode::new("intro_3", "Professor Jenkins", "Take this card.")
                    .with_option(
                        DialogueOption::new("intro_3_1", "Take the card")
                            .with_next("intro_marc_1")
                            .with_effect(Effect::add_item("marc_access_card")),
                    ),
            )
            .with_node(
                DialogueNode::new("intro_marc_1", "M.A.R.C.", "Hello, human.")
                    .with_narrator_voice()
                    .with_option(DialogueOption::new("bye", "Goodbye").with_next(""))
                    .with_option(
                        DialogueOption::new("lost", "Follow the link").with_next("missing_node"),
                    )
                    .with_option(
                        DialogueOption::new("meet", "Introduce yourself")
                            .with_effect(Effect::complete_objective("meet-client"))
                            .with_next("intro_3"),
                    )
                    .with_option(
                        DialogueOption::new("memo", "Show the memo")
                            .with_item_requirement("internal_memo"),
                    )
                    .with_option(
                        DialogueOption::new("argue", "Argue")
                            .with_stat_requirement(StatRequirement::new(Stat::Persuasion, 20)),
                    ),
            )
    }

    fn started(content: &ContentTables, node: &str) -> DialogueEngine {
        let mut engine = DialogueEngine::new(8);
        engine.start(content, node).unwrap();
        engine
    }

    fn pick(engine: &DialogueEngine, option: &str) -> Choice {
        engine.choice_for(option).unwrap()
    }

    #[test]
    fn test_start_unknown_node() {
        let content = content();
        let mut engine = DialogueEngine::new(8);

        let err = engine.start(&content, "nowhere").unwrap_err();
        assert_eq!(err, DialogueError::UnknownNode(NodeId::new("nowhere")));
        assert_eq!(engine.state(), &DialogueState::Idle);

        // An active conversation survives a bad start.
        engine.start(&content, "intro_3").unwrap();
        assert!(engine.start(&content, "nowhere").is_err());
        assert_eq!(engine.current_node_id().map(NodeId::as_str), Some("intro_3"));
    }

    #[test]
    fn test_effect_applied_before_transition() {
        let content = content();
        let mut state = GameState::default();
        let mut engine = started(&content, "intro_3");

        let choice = pick(&engine, "intro_3_1");
        let selection = engine.select(&content, &mut state, &choice).unwrap();

        assert!(state.has_item("marc_access_card"));
        assert_eq!(selection.transition, Transition::Advanced(NodeId::new("intro_marc_1")));
        assert_eq!(engine.current_node_id().map(NodeId::as_str), Some("intro_marc_1"));
        assert!(selection.effect_error.is_none());
    }

    #[test]
    fn test_empty_next_ends_dialogue() {
        let content = content();
        let mut state = GameState::default();
        let mut engine = started(&content, "intro_marc_1");

        let choice = pick(&engine, "bye");
        let selection = engine.select(&content, &mut state, &choice).unwrap();
        assert_eq!(selection.transition, Transition::Ended(EndReason::Terminal));
        assert!(!engine.is_active());

        // A later selection is a no-op.
        let err = engine.select(&content, &mut state, &choice).unwrap_err();
        assert_eq!(err, DialogueError::NotInDialogue);
    }

    #[test]
    fn test_unknown_next_fails_open() {
        let content = content();
        let mut state = GameState::default();
        let mut engine = started(&content, "intro_marc_1");

        let selection = engine
            .select(&content, &mut state, &pick(&engine, "lost"))
            .unwrap();
        assert_eq!(
            selection.transition,
            Transition::Ended(EndReason::UnknownNext(NodeId::new("missing_node")))
        );
        assert_eq!(engine.state(), &DialogueState::Idle);
    }

    #[test]
    fn test_guard_rejection_changes_nothing() {
        let content = content();
        let mut state = GameState::new(PlayerStats::uniform(10));
        let mut engine = started(&content, "intro_marc_1");
        let before = engine.state().clone();

        let err = engine
            .select(&content, &mut state, &pick(&engine, "memo"))
            .unwrap_err();
        assert!(matches!(
            err,
            DialogueError::GuardNotSatisfied {
                reason: GuardFailure::MissingItem { .. },
                ..
            }
        ));

        let err = engine
            .select(&content, &mut state, &pick(&engine, "argue"))
            .unwrap_err();
        assert!(matches!(
            err,
            DialogueError::GuardNotSatisfied {
                reason: GuardFailure::StatTooLow { .. },
                ..
            }
        ));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_stale_choice_rejected() {
        let content = content();
        let mut state = GameState::default();
        let mut engine = started(&content, "intro_3");

        let choice = pick(&engine, "intro_3_1");
        engine.select(&content, &mut state, &choice).unwrap();
        state.drain_events();

        // Double click on a node the engine already left.
        let err = engine.select(&content, &mut state, &choice).unwrap_err();
        assert!(matches!(err, DialogueError::StaleChoice { .. }));
        assert!(state.events().is_empty());
        assert_eq!(engine.current_node_id().map(NodeId::as_str), Some("intro_marc_1"));
    }

    #[test]
    fn test_reentering_a_node_gets_a_new_step() {
        let content = content();
        let mut state = GameState::default();
        let mut engine = started(&content, "intro_3");
        let first = pick(&engine, "intro_3_1");

        engine.select(&content, &mut state, &first).unwrap();
        engine
            .select(&content, &mut state, &pick(&engine, "meet"))
            .unwrap();

        // Back at intro_3, but the old choice belongs to the earlier visit.
        assert_eq!(engine.current_node_id().map(NodeId::as_str), Some("intro_3"));
        assert!(matches!(
            engine.select(&content, &mut state, &first),
            Err(DialogueError::StaleChoice { .. })
        ));
    }

    #[test]
    fn test_effect_failure_does_not_block_transition() {
        let content = content();
        let mut state = GameState::default();
        let mut engine = started(&content, "intro_marc_1");

        let selection = engine
            .select(&content, &mut state, &pick(&engine, "meet"))
            .unwrap();

        assert_eq!(selection.effect_error, Some(RuleError::NoCurrentMission));
        assert_eq!(selection.transition, Transition::Advanced(NodeId::new("intro_3")));
        assert!(!state.is_objective_complete("market_orientation", "meet-client"));

        state.start_mission(&content, "market_orientation").unwrap();
        engine
            .select(&content, &mut state, &pick(&engine, "intro_3_1"))
            .unwrap();
        engine
            .select(&content, &mut state, &pick(&engine, "meet"))
            .unwrap();
        assert!(state
            .missions()
            .is_objective_complete("market_orientation", &ObjectiveId::new("meet_client")));
    }

    #[test]
    fn test_unknown_option() {
        let content = content();
        let mut state = GameState::default();
        let mut engine = started(&content, "intro_3");

        let err = engine
            .select(&content, &mut state, &pick(&engine, "dance"))
            .unwrap_err();
        assert!(matches!(err, DialogueError::UnknownOption { .. }));
        assert!(engine.is_active());
    }

    #[test]
    fn test_present_in_declared_order() {
        let content = content();
        let state = GameState::new(PlayerStats::new(10, 25, 10, 10));
        let engine = started(&content, "intro_marc_1");

        let options = engine.present(&content, &state);
        let ids: Vec<_> = options.iter().map(|o| o.choice.option.as_str()).collect();
        assert_eq!(ids, ["bye", "lost", "meet", "memo", "argue"]);

        assert!(!options[3].available);
        assert!(options[4].available);
        assert!(options.iter().all(|o| o.choice.step == engine.current_step().unwrap()));

        assert!(DialogueEngine::new(8).present(&content, &state).is_empty());
    }

    fn briefing() -> ContentTables {
        ContentTables::new()
            .with_item(ItemDef::new("internal_memo", "Internal Memo"))
            .with_node(
                DialogueNode::new("desk", "You", "A cluttered desk.")
                    .with_option(
                        DialogueOption::new("take_memo", "Take the memo")
                            .with_effect(Effect::add_item("internal_memo"))
                            .with_next("ceo"),
                    )
                    .with_option(
                        DialogueOption::new("rehearse", "Rehearse the pitch")
                            .with_effect(Effect::modify_stat(Stat::Persuasion, 10))
                            .with_next("ceo"),
                    )
                    .with_option(
                        DialogueOption::new("quote_memo", "Quote the memo")
                            .with_item_requirement("internal_memo"),
                    ),
            )
            .with_node(
                DialogueNode::new("ceo", "CEO", "Well?")
                    .with_option(
                        DialogueOption::new("show_memo", "Hand over the memo")
                            .with_item_requirement("internal_memo")
                            .with_effect(Effect::remove_item("internal_memo")),
                    )
                    .with_option(
                        DialogueOption::new("pitch", "Pitch boldly")
                            .with_stat_requirement(StatRequirement::new(Stat::Persuasion, 20)),
                    ),
            )
    }

    #[test]
    fn test_next_node_guards_see_effect() {
        let content = briefing();
        let mut state = GameState::new(PlayerStats::uniform(10));
        let mut engine = started(&content, "desk");

        let before = engine.present(&content, &state);
        assert!(!before[2].available);
        assert_eq!(
            before[2].blocked_by,
            Some(GuardFailure::MissingItem {
                item: "internal_memo".into()
            })
        );

        let selection = engine
            .select(&content, &mut state, &before[0].choice)
            .unwrap();
        assert_eq!(selection.transition, Transition::Advanced(NodeId::new("ceo")));

        let after = engine.present(&content, &state);
        assert!(after[0].available);
        assert!(!after[1].available);

        // Guards run before the option's own effect removes the memo.
        let selection = engine
            .select(&content, &mut state, &after[0].choice)
            .unwrap();
        assert!(selection.effect_error.is_none());
        assert_eq!(selection.transition, Transition::Ended(EndReason::Terminal));
        assert!(!state.has_item("internal_memo"));
    }

    #[test]
    fn test_next_node_guards_see_stat_change() {
        let content = briefing();
        let mut state = GameState::new(PlayerStats::uniform(10));
        let mut engine = started(&content, "desk");

        engine
            .select(&content, &mut state, &pick(&engine, "rehearse"))
            .unwrap();

        let options = engine.present(&content, &state);
        assert!(options[1].available);
        engine
            .select(&content, &mut state, &options[1].choice)
            .unwrap();
        assert!(!engine.is_active());
    }

    #[test]
    fn test_history_is_bounded_and_reset() {
        let content = content();
        let mut state = GameState::default();
        let mut engine = DialogueEngine::new(2);
        engine.start(&content, "intro_3").unwrap();

        engine
            .select(&content, &mut state, &pick(&engine, "intro_3_1"))
            .unwrap();
        engine
            .select(&content, &mut state, &pick(&engine, "meet"))
            .unwrap();

        let history: Vec<_> = engine.history().map(NodeId::as_str).collect();
        assert_eq!(history, ["intro_marc_1", "intro_3"]);

        engine.start(&content, "intro_marc_1").unwrap();
        let history: Vec<_> = engine.history().map(NodeId::as_str).collect();
        assert_eq!(history, ["intro_marc_1"]);
    }
}
