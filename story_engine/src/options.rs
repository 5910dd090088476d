//! Option availability.
//!
//! Uses the same require/forbid/comparison rules as step matching, except
//! that internal tags never gate a player-facing choice (whatever their
//! operator) and grant/consume tokens only apply on selection.

use serde::{Deserialize, Serialize};
use story_rules::{PlayerState, StepOption};

use crate::conditions;
use crate::config::EngineConfig;

/// How an option should be presented right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionState {
    /// Shown and selectable.
    Available,
    /// Shown but disabled.
    Disabled,
    /// A hidden option whose requirements are unmet: not shown at all.
    Hidden,
}

/// Decides option availability for a player.
#[derive(Debug, Clone, Copy)]
pub struct OptionGate<'c> {
    config: &'c EngineConfig,
}

impl<'c> OptionGate<'c> {
    pub fn new(config: &'c EngineConfig) -> Self {
        Self { config }
    }

    /// Whether the option may be selected.
    pub fn is_available(&self, option: &StepOption, state: &PlayerState) -> bool {
        let gating = option
            .tags
            .iter()
            .filter(|t| !self.config.is_internal(&t.name));
        conditions::player_conditions_hold(gating, state)
    }

    pub fn state_of(&self, option: &StepOption, state: &PlayerState) -> OptionState {
        match (self.is_available(option, state), option.hidden) {
            (true, _) => OptionState::Available,
            (false, false) => OptionState::Disabled,
            (false, true) => OptionState::Hidden,
        }
    }
}
