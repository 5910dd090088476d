//! Step matcher - picks the single most appropriate step for an id.
//!
//! 1. **Candidates**: steps whose id equals the requested id, case-insensitively
//! 2. **Hard filter**: every require/forbid condition must pass
//! 3. **Soft score**: each satisfied `@` token adds the preferred-tag weight
//! 4. **Tie-break**: uniform random choice among the top-scoring survivors
//!
//! Bare requires filter but never score. An empty survivor set is a coverage
//! gap, not an error.

use rand::seq::SliceRandom;
use rand::Rng;
use story_rules::{PlayerState, Step, TagOperator};

use crate::conditions;
use crate::config::EngineConfig;

/// A step that passed the hard filter, with its soft score.
#[derive(Debug, Clone, Copy)]
pub struct ScoredStep<'s> {
    pub step: &'s Step,
    /// Position among the steps handed to the matcher.
    pub index: usize,
    pub score: i32,
}

/// Everything the matcher learned about one id.
#[derive(Debug, Clone)]
pub struct MatchResult<'s> {
    pub id: String,
    /// Steps sharing the id, before filtering.
    pub considered: usize,
    pub survivors: Vec<ScoredStep<'s>>,
}

impl<'s> MatchResult<'s> {
    pub fn top_score(&self) -> Option<i32> {
        self.survivors.iter().map(|s| s.score).max()
    }

    /// Survivors sharing the top score.
    pub fn best(&self) -> Vec<ScoredStep<'s>> {
        match self.top_score() {
            Some(top) => self
                .survivors
                .iter()
                .filter(|s| s.score == top)
                .copied()
                .collect(),
            None => Vec::new(),
        }
    }

    /// No step survived the hard filter.
    pub fn is_gap(&self) -> bool {
        self.survivors.is_empty()
    }

    /// More than one step shares the top score.
    pub fn is_ambiguous(&self) -> bool {
        self.best().len() > 1
    }

    /// Choose uniformly among the top-scoring survivors.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'s Step> {
        let best = self.best();
        let chosen = best.choose(rng)?;
        tracing::debug!(
            id = %self.id,
            considered = self.considered,
            survivors = self.survivors.len(),
            score = chosen.score,
            tied = best.len(),
            "step selected"
        );
        Some(chosen.step)
    }
}

/// Filters and scores candidate steps.
#[derive(Debug, Clone)]
pub struct StepMatcher {
    preferred_tag_weight: i32,
}

impl StepMatcher {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            preferred_tag_weight: config.preferred_tag_weight,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&EngineConfig::default())
    }

    /// Whether a step passes every hard filter.
    pub fn passes(&self, step: &Step, state: &PlayerState) -> bool {
        conditions::player_conditions_hold(&step.tags, state)
    }

    /// Soft score: the preferred weight for each satisfied `@` token.
    pub fn score(&self, step: &Step, state: &PlayerState) -> i32 {
        step.tags
            .iter()
            .filter(|t| t.operator == TagOperator::RequireExplicit)
            .filter(|t| conditions::holds(t, state.count(&t.name)))
            .map(|_| self.preferred_tag_weight)
            .sum()
    }

    /// Filter and score every candidate for `id` without choosing.
    pub fn evaluate<'s>(
        &self,
        id: &str,
        state: &PlayerState,
        candidates: impl IntoIterator<Item = &'s Step>,
    ) -> MatchResult<'s> {
        let mut considered = 0;
        let mut survivors = Vec::new();

        for (index, step) in candidates.into_iter().enumerate() {
            if !step.has_id(id) {
                continue;
            }
            considered += 1;

            if !self.passes(step, state) {
                tracing::trace!(id, index, "candidate filtered out");
                continue;
            }

            survivors.push(ScoredStep {
                step,
                index,
                score: self.score(step, state),
            });
        }

        MatchResult {
            id: id.to_string(),
            considered,
            survivors,
        }
    }

    /// Select the step to show for `id`, or None on a coverage gap.
    pub fn select_step<'s, R: Rng + ?Sized>(
        &self,
        id: &str,
        state: &PlayerState,
        candidates: impl IntoIterator<Item = &'s Step>,
        rng: &mut R,
    ) -> Option<&'s Step> {
        let result = self.evaluate(id, state, candidates);
        if result.is_gap() {
            tracing::debug!(id, considered = result.considered, "no step matches");
            return None;
        }
        result.pick(rng)
    }
}
