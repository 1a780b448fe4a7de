//! Player state - the single aggregate every effect is applied to.
//!
//! `GameState` owns the inventory, the skill values, the mission log and the
//! pending event queue. Content is never owned here; every mutation that
//! needs a catalog entry borrows the [`ContentTables`] it runs against.
//!
//! Mutations either succeed or leave the state untouched and return a
//! [`RuleError`]. Rejected mutations are logged at `warn`.

mod events;

pub use events::GameEvent;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::content::{ContentTables, ItemDef, MissionDef, Reward};
use crate::entities::{Inventory, ItemId, MissionId, ObjectiveId, PlayerStats};
use crate::error::RuleError;
use crate::mechanics::{Effect, Stat};
use crate::missions::{MissionLog, MissionStatus, ObjectiveStatus};

/// Everything that belongs to the player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameState {
    stats: PlayerStats,
    inventory: Inventory,
    missions: MissionLog,

    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh state with the given starting skills.
    pub fn new(stats: PlayerStats) -> Self {
        Self {
            stats,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn missions(&self) -> &MissionLog {
        &self.missions
    }

    /// Events queued since the last drain.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply an effect through the subsystem that owns it.
    pub fn apply_effect(
        &mut self,
        content: &ContentTables,
        effect: &Effect,
    ) -> Result<(), RuleError> {
        debug!(%effect, "applying effect");
        match effect {
            Effect::AddItem { item } => self.add_item(content, item.as_str()).map(drop),
            Effect::RemoveItem { item } => self.remove_item(content, item.as_str()).map(drop),
            Effect::ModifyStat { stat, amount } => {
                self.modify_stat(*stat, *amount);
                Ok(())
            }
            Effect::StartMission { mission } => {
                self.start_mission(content, mission.as_str()).map(drop)
            }
            Effect::CompleteMission { mission } => self.complete_mission(content, mission.as_str()),
            Effect::CompleteObjective { objective } => {
                self.complete_current_objective(content, objective).map(drop)
            }
        }
    }

    // === Inventory ===

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.has(item)
    }

    pub fn selected_item(&self) -> Option<&ItemId> {
        self.inventory.selected()
    }

    /// Give the player an item. Returns false if it was already held.
    pub fn add_item(&mut self, content: &ContentTables, item: &str) -> Result<bool, RuleError> {
        let def = item_def(content, item)?;
        if !self.inventory.add(def.id.clone()) {
            debug!(item = %def.id, "item already held");
            return Ok(false);
        }

        info!(item = %def.id, "item acquired");
        self.events.push(GameEvent::ItemAcquired {
            item: def.id.clone(),
            name: def.name.clone(),
        });
        Ok(true)
    }

    /// Take an item away. Returns false if it was not held.
    pub fn remove_item(&mut self, content: &ContentTables, item: &str) -> Result<bool, RuleError> {
        let def = item_def(content, item)?;
        if !self.inventory.remove(item) {
            debug!(item = %def.id, "item not held, nothing to remove");
            return Ok(false);
        }

        info!(item = %def.id, "item removed");
        self.events.push(GameEvent::ItemRemoved { item: def.id.clone() });
        Ok(true)
    }

    pub fn select_item(&mut self, item: &str) -> Result<(), RuleError> {
        self.inventory.select(item).map_err(rejected)
    }

    pub fn clear_selection(&mut self) {
        self.inventory.clear_selection();
    }

    /// Use a held item, applying its use effect.
    ///
    /// The item stays in the inventory.
    pub fn use_item(&mut self, content: &ContentTables, item: &str) -> Result<(), RuleError> {
        let def = item_def(content, item)?;
        if !self.inventory.has(item) {
            return Err(rejected(RuleError::ItemNotHeld(def.id.clone())));
        }
        if !def.usable {
            return Err(rejected(RuleError::ItemNotUsable(def.id.clone())));
        }

        if let Some(effect) = &def.use_effect {
            self.apply_effect(content, effect)?;
        }

        info!(item = %def.id, "item used");
        self.events.push(GameEvent::ItemUsed { item: def.id.clone() });
        if let Some(message) = &def.use_message {
            self.events.push(GameEvent::notice(message.clone()));
        }
        Ok(())
    }

    /// Combine two items. The selection is cleared whatever the outcome.
    ///
    /// A combination the catalog does not allow queues a notice for the
    /// player besides returning [`RuleError::CannotCombine`].
    pub fn combine_items(
        &mut self,
        content: &ContentTables,
        first: &str,
        second: &str,
    ) -> Result<(), RuleError> {
        self.inventory.clear_selection();
        let first = item_def(content, first)?;
        let second = item_def(content, second)?;

        match self.inventory.combine(first, second) {
            Ok(()) => {
                info!(first = %first.id, second = %second.id, "items combined");
                self.events.push(GameEvent::ItemsCombined {
                    first: first.id.clone(),
                    second: second.id.clone(),
                });
                Ok(())
            }
            Err(err) => {
                if matches!(err, RuleError::CannotCombine { .. }) {
                    self.events.push(GameEvent::notice(format!(
                        "You can't combine {} with {}",
                        first.name, second.name
                    )));
                }
                Err(rejected(err))
            }
        }
    }

    // === Stats ===

    /// Change a skill, clamped to its range. Returns the applied delta.
    pub fn modify_stat(&mut self, stat: Stat, amount: i32) -> i32 {
        let from = self.stats.get(stat);
        let applied = self.stats.modify(stat, amount);
        if applied != 0 {
            let to = self.stats.get(stat);
            info!(%stat, from, to, "stat changed");
            self.events.push(GameEvent::StatChanged { stat, from, to });
        } else {
            debug!(%stat, amount, "stat unchanged");
        }
        applied
    }

    // === Missions ===

    pub fn current_mission(&self) -> Option<&MissionId> {
        self.missions.current()
    }

    pub fn mission_status(&self, mission: &str) -> MissionStatus {
        self.missions.status(mission)
    }

    pub fn is_mission_complete(&self, mission: &str) -> bool {
        self.missions.is_mission_complete(mission)
    }

    pub fn is_objective_complete(&self, mission: &str, objective: impl AsRef<str>) -> bool {
        self.missions
            .is_objective_complete(mission, &ObjectiveId::new(objective))
    }

    /// Ordered objectives of a mission with completion flags.
    pub fn objectives(
        &self,
        content: &ContentTables,
        mission: &str,
    ) -> Result<Vec<ObjectiveStatus>, RuleError> {
        Ok(self.missions.objectives(mission_def(content, mission)?))
    }

    /// Completed and total objective counts.
    pub fn progress(
        &self,
        content: &ContentTables,
        mission: &str,
    ) -> Result<(usize, usize), RuleError> {
        let def = mission_def(content, mission)?;
        let done = self
            .missions
            .progress(mission)
            .map(|p| p.completed_count())
            .unwrap_or(0);
        Ok((done, def.objectives.len()))
    }

    /// Make a mission current. Returns false if it already was.
    pub fn start_mission(
        &mut self,
        content: &ContentTables,
        mission: &str,
    ) -> Result<bool, RuleError> {
        let def = mission_def(content, mission)?;
        let started = self.missions.start(def).map_err(rejected)?;
        if started {
            info!(mission = %def.id, "mission started");
            self.events.push(GameEvent::MissionStarted {
                mission: def.id.clone(),
                title: def.title.clone(),
            });
        }
        Ok(started)
    }

    /// Complete one objective of a mission. Returns false if it already was.
    ///
    /// The mission itself is not completed, even when this was the last
    /// open objective.
    pub fn complete_objective(
        &mut self,
        content: &ContentTables,
        mission: &str,
        objective: &ObjectiveId,
    ) -> Result<bool, RuleError> {
        let def = mission_def(content, mission)?;
        let newly = self
            .missions
            .complete_objective(def, objective)
            .map_err(rejected)?;

        if newly {
            info!(mission = %def.id, %objective, "objective completed");
            self.events.push(GameEvent::ObjectiveCompleted {
                mission: def.id.clone(),
                objective: objective.clone(),
            });
        } else {
            debug!(mission = %def.id, %objective, "objective already completed");
        }
        Ok(newly)
    }

    /// Complete an objective of whichever mission is current.
    pub fn complete_current_objective(
        &mut self,
        content: &ContentTables,
        objective: &ObjectiveId,
    ) -> Result<bool, RuleError> {
        let mission = match self.missions.current() {
            Some(mission) => mission.clone(),
            None => return Err(rejected(RuleError::NoCurrentMission)),
        };
        self.complete_objective(content, mission.as_str(), objective)
    }

    /// Complete a mission and grant its reward.
    ///
    /// Open objectives are completed first. The reward is applied once; a
    /// second call fails with [`RuleError::MissionAlreadyCompleted`].
    pub fn complete_mission(
        &mut self,
        content: &ContentTables,
        mission: &str,
    ) -> Result<(), RuleError> {
        let def = mission_def(content, mission)?;
        let forced = self.missions.complete(def).map_err(rejected)?;

        for objective in forced {
            debug!(mission = %def.id, %objective, "objective completed with mission");
            self.events.push(GameEvent::ObjectiveCompleted {
                mission: def.id.clone(),
                objective,
            });
        }

        info!(mission = %def.id, "mission completed");
        self.events.push(GameEvent::MissionCompleted {
            mission: def.id.clone(),
            title: def.title.clone(),
        });
        self.grant_reward(content, &def.reward);
        Ok(())
    }

    fn grant_reward(&mut self, content: &ContentTables, reward: &Reward) {
        for (stat, amount) in reward.stats.iter() {
            self.modify_stat(stat, amount);
        }
        for item in &reward.items {
            // Unknown reward items are caught by content validation; a
            // missing one must not undo the completion.
            if let Err(err) = self.add_item(content, item.as_str()) {
                warn!(%err, "reward item skipped");
            }
        }
    }
}

fn item_def<'a>(content: &'a ContentTables, item: &str) -> Result<&'a ItemDef, RuleError> {
    content
        .item(item)
        .ok_or_else(|| rejected(RuleError::UnknownItem(ItemId::new(item))))
}

fn mission_def<'a>(
    content: &'a ContentTables,
    mission: &str,
) -> Result<&'a MissionDef, RuleError> {
    content
        .mission(mission)
        .ok_or_else(|| rejected(RuleError::UnknownMission(MissionId::new(mission))))
}

fn rejected(err: RuleError) -> RuleError {
    warn!(%err, "rule rejected");
    err
}
