//! Option guards.

use adventure_rules::content::DialogueOption;
use adventure_rules::{GameState, ItemId, Stat};
use serde::Serialize;
use thiserror::Error;

/// Why an option cannot be picked right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardFailure {
    #[error("requires {stat} {required} (have {actual})")]
    StatTooLow { stat: Stat, required: u8, actual: u8 },

    #[error("requires item '{item}'")]
    MissingItem { item: ItemId },
}

/// Check an option's guards against the player state.
///
/// The stat requirement is checked before the item requirement.
pub fn check(option: &DialogueOption, state: &GameState) -> Result<(), GuardFailure> {
    if let Some(requirement) = &option.requires_stat {
        let actual = state.stats().get(requirement.stat);
        if actual < requirement.min_value {
            return Err(GuardFailure::StatTooLow {
                stat: requirement.stat,
                required: requirement.min_value,
                actual,
            });
        }
    }

    if let Some(item) = &option.requires_item {
        if !state.has_item(item.as_str()) {
            return Err(GuardFailure::MissingItem { item: item.clone() });
        }
    }

    Ok(())
}

pub fn is_available(option: &DialogueOption, state: &GameState) -> bool {
    check(option, state).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_rules::{ContentTables, PlayerStats, StatRequirement};
    use adventure_rules::content::ItemDef;

    #[test]
    fn test_unguarded_option_is_available() {
        let option = DialogueOption::new("a", "Hello");
        assert!(is_available(&option, &GameState::default()));
    }

    #[test]
    fn test_stat_threshold_is_inclusive() {
        let option = DialogueOption::new("a", "Argue")
            .with_stat_requirement(StatRequirement::new(Stat::Persuasion, 20));

        let state = GameState::new(PlayerStats::new(10, 19, 10, 10));
        assert_eq!(
            check(&option, &state),
            Err(GuardFailure::StatTooLow {
                stat: Stat::Persuasion,
                required: 20,
                actual: 19
            })
        );

        let state = GameState::new(PlayerStats::new(10, 20, 10, 10));
        assert!(is_available(&option, &state));
    }

    #[test]
    fn test_item_requirement() {
        let content =
            ContentTables::new().with_item(ItemDef::new("internal_memo", "Internal Memo"));
        let option =
            DialogueOption::new("a", "Show the memo").with_item_requirement("internal_memo");
        let mut state = GameState::default();

        assert_eq!(
            check(&option, &state),
            Err(GuardFailure::MissingItem {
                item: ItemId::new("internal_memo")
            })
        );

        state.add_item(&content, "internal_memo").unwrap();
        assert!(is_available(&option, &state));
    }

    #[test]
    fn test_stat_checked_before_item() {
        let option = DialogueOption::new("a", "Both")
            .with_stat_requirement(StatRequirement::new(Stat::Research, 90))
            .with_item_requirement("internal_memo");

        assert!(matches!(
            check(&option, &GameState::default()),
            Err(GuardFailure::StatTooLow { .. })
        ));
    }
}
