//! Step executor - applies a step's effects to the player and renders its text.
//!
//! Order of operations is fixed:
//! 1. Grant/consume tokens, names rendered against the current variables
//! 2. Quest-scope purge when the quest tag is consumed
//! 3. Variable declarations
//! 4. Log template, rendered after variables resolve, prepended to the log
//! 5. Display text

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use story_rules::{PlayerState, Step, TagOperator, TagToken, VarDecl};

use crate::config::EngineConfig;
use crate::render::render;

/// One applied tag mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppliedMutation {
    Granted(String),
    Consumed(String),
    /// Consume of a tag the player did not hold; nothing changed.
    NotHeld(String),
    /// The quest tag was consumed and this many quest-scoped copies were purged.
    QuestCleared { purged: usize },
}

/// What an execution produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub text: String,
    pub log_entry: Option<String>,
    pub mutations: Vec<AppliedMutation>,
}

/// Applies steps to a player state.
#[derive(Debug, Clone, Copy)]
pub struct StepExecutor<'c> {
    config: &'c EngineConfig,
}

impl<'c> StepExecutor<'c> {
    pub fn new(config: &'c EngineConfig) -> Self {
        Self { config }
    }

    /// Execute a (possibly composed) step against the player.
    pub fn execute<R: Rng + ?Sized>(
        &self,
        step: &Step,
        state: &mut PlayerState,
        rng: &mut R,
    ) -> Execution {
        let mutations = self.apply_mutations(&step.tags, state);
        self.resolve_variables(&step.vars, state, rng);

        let log_entry = step.log.as_ref().map(|template| {
            let entry = render(template, state.variables());
            state.push_log(entry.clone(), self.config.log_capacity);
            entry
        });

        state.turn += 1;
        state.record_visit(&step.id);

        Execution {
            text: render(&step.text, state.variables()),
            log_entry,
            mutations,
        }
    }

    /// Apply every grant/consume token in order. Other tokens are ignored.
    pub fn apply_mutations<'t>(
        &self,
        tokens: impl IntoIterator<Item = &'t TagToken>,
        state: &mut PlayerState,
    ) -> Vec<AppliedMutation> {
        let mut applied = Vec::new();

        for token in tokens {
            let name = render(&token.name, state.variables());
            match token.operator {
                TagOperator::Grant => {
                    state.grant(name.clone());
                    applied.push(AppliedMutation::Granted(name));
                }
                TagOperator::Consume => {
                    if !state.consume(&name) {
                        applied.push(AppliedMutation::NotHeld(name));
                        continue;
                    }
                    let is_quest = name == self.config.quest_tag;
                    applied.push(AppliedMutation::Consumed(name));

                    if is_quest && !self.config.quest_prefix.is_empty() {
                        let purged = state.purge_prefix(&self.config.quest_prefix);
                        tracing::debug!(purged, prefix = %self.config.quest_prefix, "quest scope cleared");
                        applied.push(AppliedMutation::QuestCleared { purged });
                    }
                }
                _ => {}
            }
        }

        applied
    }

    /// Resolve variable declarations in name order.
    pub fn resolve_variables<R: Rng + ?Sized>(
        &self,
        vars: &BTreeMap<String, VarDecl>,
        state: &mut PlayerState,
        rng: &mut R,
    ) {
        for (name, decl) in vars {
            match decl {
                VarDecl::Clear => state.clear_variable(name),
                VarDecl::Pick(values) => match values.choose(rng) {
                    Some(value) => state.set_variable(name.clone(), value.clone()),
                    None => tracing::trace!(name = %name, "empty value list, variable untouched"),
                },
                VarDecl::PickEntity(entities) => match entities.choose(rng) {
                    Some(fields) => {
                        state.clear_variable(name);
                        for (field, value) in fields {
                            state.set_variable(format!("{}.{}", name, field), value.clone());
                        }
                    }
                    None => tracing::trace!(name = %name, "empty entity list, variable untouched"),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_market_rope_scenario() {
        let config = EngineConfig::default();
        let executor = StepExecutor::new(&config);
        let step = Step::new("Market", "You pocket a coil of rope.")
            .with_tag("+inv:rope")
            .with_log("Took rope");

        let mut state = PlayerState::new();
        let execution = executor.execute(&step, &mut state, &mut rng());

        assert_eq!(state.count("inv:rope"), 1);
        assert_eq!(state.latest_log(), Some("Took rope"));
        assert_eq!(execution.text, "You pocket a coil of rope.");
        assert_eq!(state.turn, 1);
        assert_eq!(state.visits("market"), 1);
    }

    #[test]
    fn test_consume_is_noop_when_absent() {
        let config = EngineConfig::default();
        let executor = StepExecutor::new(&config);
        let mut state = PlayerState::new().with_tags(["coin"]);

        let applied = executor.apply_mutations(&[TagToken::consume("gem")], &mut state);

        assert_eq!(applied, vec![AppliedMutation::NotHeld("gem".into())]);
        assert_eq!(state.tags().len(), 1);
    }

    #[test]
    fn test_consuming_quest_clears_scope() {
        let config = EngineConfig::default();
        let executor = StepExecutor::new(&config);
        let mut state = PlayerState::new().with_tags(["quest", "q:a", "q:b", "trait:x"]);

        let step = Step::new("shrine", "The quest is done.").with_tag("-quest");
        executor.execute(&step, &mut state, &mut rng());

        assert_eq!(state.tags(), ["trait:x".to_string()]);
    }

    #[test]
    fn test_mutation_renders_before_variables_change() {
        let config = EngineConfig::default();
        let executor = StepExecutor::new(&config);
        let mut state = PlayerState::new().with_tags(["met:Mara"]);
        state.set_variable("npc.name", "Mara");

        let step = Step::new("farewell", "{{npc.name}} is gone.")
            .with_tag("-met:{{npc.name}}")
            .with_var("npc", VarDecl::Clear);
        let execution = executor.execute(&step, &mut state, &mut rng());

        assert_eq!(state.count("met:Mara"), 0);
        assert!(state.variable("npc.name").is_none());
        assert_eq!(execution.text, "{{npc.name}} is gone.");
    }

    #[test]
    fn test_pick_stores_one_of_the_values() {
        let config = EngineConfig::default();
        let executor = StepExecutor::new(&config);
        let mut state = PlayerState::new();

        let step = Step::new("tavern", "You order {{drink}}.")
            .with_var("drink", VarDecl::Pick(vec!["ale".into(), "wine".into()]));
        let execution = executor.execute(&step, &mut state, &mut rng());

        let drink = state.variable("drink").unwrap().to_string();
        assert!(drink == "ale" || drink == "wine");
        assert_eq!(execution.text, format!("You order {}.", drink));
    }

    #[test]
    fn test_pick_entity_replaces_fields_wholesale() {
        let config = EngineConfig::default();
        let executor = StepExecutor::new(&config);
        let mut state = PlayerState::new();
        state.set_variable("npc.title", "Captain");

        let entity: BTreeMap<String, String> = [("name", "Mara"), ("gender", "female")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let step = Step::new("dock", "{{npc.name}} tips {{npc.their}} hat.")
            .with_var("npc", VarDecl::PickEntity(vec![entity]))
            .with_log("Met {{npc.name}}");

        let execution = executor.execute(&step, &mut state, &mut rng());

        assert!(state.variable("npc.title").is_none());
        assert_eq!(state.variable("npc.gender"), Some("female"));
        assert_eq!(execution.text, "Mara tips her hat.");
        assert_eq!(execution.log_entry.as_deref(), Some("Met Mara"));
    }

    #[test]
    fn test_log_capacity_is_respected() {
        let config = EngineConfig {
            log_capacity: 2,
            ..Default::default()
        };
        let executor = StepExecutor::new(&config);
        let mut state = PlayerState::new();

        for i in 0..4 {
            let step = Step::new("road", "").with_log(format!("mile {}", i));
            executor.execute(&step, &mut state, &mut rng());
        }

        let entries: Vec<_> = state.log().collect();
        assert_eq!(entries, ["mile 3", "mile 2"]);
    }
}
