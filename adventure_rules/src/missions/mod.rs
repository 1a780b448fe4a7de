//! Mission and objective progress.
//!
//! Progress is one-way: objectives go from open to completed, missions from
//! locked to active to completed. Finishing every objective does not complete
//! the mission; that takes an explicit [`MissionLog::complete`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::content::MissionDef;
use crate::entities::{MissionId, ObjectiveId};
use crate::error::RuleError;

/// Lifecycle of a mission for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    /// Never started.
    #[default]
    Locked,
    /// Started and not yet completed. Only one active mission is current.
    Active,
    Completed,
}

/// Completion flag for one objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    pub id: ObjectiveId,
    pub completed: bool,
}

/// Progress of a single mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionProgress {
    pub mission_id: MissionId,
    pub status: MissionStatus,
    objectives: Vec<ObjectiveProgress>,
}

impl MissionProgress {
    fn new(def: &MissionDef) -> Self {
        Self {
            mission_id: def.id.clone(),
            status: MissionStatus::Locked,
            objectives: def
                .objectives
                .iter()
                .map(|o| ObjectiveProgress {
                    id: o.id.clone(),
                    completed: false,
                })
                .collect(),
        }
    }

    pub fn objectives(&self) -> &[ObjectiveProgress] {
        &self.objectives
    }

    pub fn is_objective_complete(&self, objective: &ObjectiveId) -> bool {
        self.objectives
            .iter()
            .any(|o| &o.id == objective && o.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.objectives.iter().filter(|o| o.completed).count()
    }

    pub fn total(&self) -> usize {
        self.objectives.len()
    }

    pub fn all_objectives_complete(&self) -> bool {
        self.objectives.iter().all(|o| o.completed)
    }

    /// `None` if the objective is not part of this mission.
    fn mark_objective(&mut self, objective: &ObjectiveId) -> Option<bool> {
        let entry = self.objectives.iter_mut().find(|o| &o.id == objective)?;
        let newly = !entry.completed;
        entry.completed = true;
        Some(newly)
    }

    fn mark_remaining(&mut self) -> Vec<ObjectiveId> {
        self.objectives
            .iter_mut()
            .filter(|o| !o.completed)
            .map(|o| {
                o.completed = true;
                o.id.clone()
            })
            .collect()
    }
}

/// An objective with its description, for the objectives panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectiveStatus {
    pub id: ObjectiveId,
    pub description: String,
    pub completed: bool,
}

/// Progress of every mission the player has touched, plus the current one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionLog {
    progress: BTreeMap<MissionId, MissionProgress>,
    current: Option<MissionId>,
}

impl MissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mission currently being worked on.
    pub fn current(&self) -> Option<&MissionId> {
        self.current.as_ref()
    }

    pub fn status(&self, mission: &str) -> MissionStatus {
        self.progress
            .get(mission)
            .map(|p| p.status)
            .unwrap_or_default()
    }

    pub fn progress(&self, mission: &str) -> Option<&MissionProgress> {
        self.progress.get(mission)
    }

    pub fn is_mission_complete(&self, mission: &str) -> bool {
        self.status(mission) == MissionStatus::Completed
    }

    pub fn is_objective_complete(&self, mission: &str, objective: &ObjectiveId) -> bool {
        self.progress
            .get(mission)
            .map(|p| p.is_objective_complete(objective))
            .unwrap_or(false)
    }

    /// Make a mission current.
    ///
    /// Progress from an earlier visit is kept. Returns false if the mission
    /// was already current.
    pub fn start(&mut self, def: &MissionDef) -> Result<bool, RuleError> {
        let progress = self.entry(def);
        if progress.status == MissionStatus::Completed {
            return Err(RuleError::MissionAlreadyCompleted(def.id.clone()));
        }
        progress.status = MissionStatus::Active;

        if self.current.as_ref() == Some(&def.id) {
            return Ok(false);
        }
        self.current = Some(def.id.clone());
        Ok(true)
    }

    /// Mark an objective completed. Returns false if it already was.
    pub fn complete_objective(
        &mut self,
        def: &MissionDef,
        objective: &ObjectiveId,
    ) -> Result<bool, RuleError> {
        if !def.has_objective(objective) {
            return Err(RuleError::UnknownObjective {
                mission: def.id.clone(),
                objective: objective.clone(),
            });
        }
        Ok(self.entry(def).mark_objective(objective).unwrap_or(false))
    }

    /// Complete a mission.
    ///
    /// Objectives still open are marked completed first so a completed
    /// mission never has open objectives. Returns the objectives marked this
    /// way. Completing the current mission clears the current slot.
    pub fn complete(&mut self, def: &MissionDef) -> Result<Vec<ObjectiveId>, RuleError> {
        let progress = self.entry(def);
        if progress.status == MissionStatus::Completed {
            return Err(RuleError::MissionAlreadyCompleted(def.id.clone()));
        }

        let forced = progress.mark_remaining();
        progress.status = MissionStatus::Completed;

        if self.current.as_ref() == Some(&def.id) {
            self.current = None;
        }
        Ok(forced)
    }

    /// Objectives of a mission in declared order, with completion flags.
    pub fn objectives(&self, def: &MissionDef) -> Vec<ObjectiveStatus> {
        def.objectives
            .iter()
            .map(|o| ObjectiveStatus {
                id: o.id.clone(),
                description: o.description.clone(),
                completed: self.is_objective_complete(def.id.as_str(), &o.id),
            })
            .collect()
    }

    fn entry(&mut self, def: &MissionDef) -> &mut MissionProgress {
        self.progress
            .entry(def.id.clone())
            .or_insert_with(|| MissionProgress::new(def))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orientation() -> MissionDef {
        MissionDef::new("market_orientation", "Marketing Orientation Analysis")
            .with_objective("meet-client", "Meet with the CEO")
            .with_objective("gather-employee-insight", "Talk to an employee")
            .with_objective("identify-orientation", "Determine the orientation")
            .with_objective("prepare-report", "Prepare a report")
    }

    fn intro() -> MissionDef {
        MissionDef::new("game_intro", "Welcome")
            .with_objective("complete-tutorial", "Complete the tutorial")
    }

    #[test]
    fn test_start_sets_current() {
        let mut log = MissionLog::new();
        let mission = orientation();

        assert_eq!(log.status("market_orientation"), MissionStatus::Locked);
        assert!(log.start(&mission).unwrap());
        assert_eq!(log.current().map(MissionId::as_str), Some("market_orientation"));
        assert_eq!(log.status("market_orientation"), MissionStatus::Active);

        // Starting again is a no-op.
        assert!(!log.start(&mission).unwrap());
    }

    #[test]
    fn test_only_one_current_mission() {
        let mut log = MissionLog::new();
        log.start(&orientation()).unwrap();
        log.start(&intro()).unwrap();

        assert_eq!(log.current().map(MissionId::as_str), Some("game_intro"));
        // The previous mission stays active but is no longer current.
        assert_eq!(log.status("market_orientation"), MissionStatus::Active);
    }

    #[test]
    fn test_reentry_keeps_progress() {
        let mut log = MissionLog::new();
        let mission = orientation();
        let objective = ObjectiveId::new("meet-client");

        log.start(&mission).unwrap();
        log.complete_objective(&mission, &objective).unwrap();
        log.start(&intro()).unwrap();
        log.start(&mission).unwrap();

        assert!(log.is_objective_complete("market_orientation", &objective));
    }

    #[test]
    fn test_complete_objective_is_one_way() {
        let mut log = MissionLog::new();
        let mission = orientation();
        let objective = ObjectiveId::new("identify_orientation");

        assert!(log.complete_objective(&mission, &objective).unwrap());
        assert!(!log.complete_objective(&mission, &objective).unwrap());
        assert!(log.is_objective_complete("market_orientation", &objective));
    }

    #[test]
    fn test_unknown_objective_rejected() {
        let mut log = MissionLog::new();
        let mission = orientation();
        let err = log
            .complete_objective(&mission, &ObjectiveId::new("write-poem"))
            .unwrap_err();

        assert!(matches!(err, RuleError::UnknownObjective { .. }));
        assert!(log.progress("market_orientation").is_none());
        assert_eq!(log.status("market_orientation"), MissionStatus::Locked);
    }

    #[test]
    fn test_unknown_objective_leaves_existing_progress() {
        let mut log = MissionLog::new();
        let mission = orientation();
        log.start(&mission).unwrap();
        let before = serde_json::to_value(&log).unwrap();

        assert!(log
            .complete_objective(&mission, &ObjectiveId::new("zzz"))
            .is_err());
        assert_eq!(serde_json::to_value(&log).unwrap(), before);
    }

    #[test]
    fn test_all_objectives_done_does_not_complete_mission() {
        let mut log = MissionLog::new();
        let mission = intro();
        log.start(&mission).unwrap();
        log.complete_objective(&mission, &ObjectiveId::new("complete-tutorial")).unwrap();

        assert!(log.progress("game_intro").unwrap().all_objectives_complete());
        assert!(!log.is_mission_complete("game_intro"));
    }

    #[test]
    fn test_complete_marks_remaining_objectives() {
        let mut log = MissionLog::new();
        let mission = orientation();
        log.start(&mission).unwrap();
        log.complete_objective(&mission, &ObjectiveId::new("meet-client")).unwrap();

        let forced = log.complete(&mission).unwrap();
        assert_eq!(forced.len(), 3);
        assert!(log.is_mission_complete("market_orientation"));
        assert!(log.progress("market_orientation").unwrap().all_objectives_complete());
        assert!(log.current().is_none());
    }

    #[test]
    fn test_complete_twice_rejected() {
        let mut log = MissionLog::new();
        let mission = intro();
        log.complete(&mission).unwrap();

        let err = log.complete(&mission).unwrap_err();
        assert_eq!(err, RuleError::MissionAlreadyCompleted(MissionId::new("game_intro")));

        let err = log.start(&mission).unwrap_err();
        assert_eq!(err, RuleError::MissionAlreadyCompleted(MissionId::new("game_intro")));
        assert!(log.current().is_none());
    }

    #[test]
    fn test_objectives_view_in_declared_order() {
        let mut log = MissionLog::new();
        let mission = orientation();
        log.complete_objective(&mission, &ObjectiveId::new("prepare-report")).unwrap();

        let view = log.objectives(&mission);
        let ids: Vec<_> = view.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            ids,
            ["meet-client", "gather-employee-insight", "identify-orientation", "prepare-report"]
        );
        assert!(!view[0].completed);
        assert!(view[3].completed);
    }
}
