//! Coverage lint - a side-effect-free dry run of the matcher over tag combinations.
//!
//! For one id, every presence/absence combination of the tags its candidates
//! reference is tried. A combination with no survivor is a gap; one with more
//! than one top-scoring survivor is an ambiguity. Nothing is executed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use story_rules::PlayerState;

use crate::config::EngineConfig;
use crate::library::ContentLibrary;
use crate::matcher::StepMatcher;

/// Above this many referenced tags only the first (sorted) ones are enumerated.
pub const MAX_LINT_TAGS: usize = 12;

/// Tie between candidates for one tag combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambiguity {
    pub held: Vec<String>,
    /// Positions of the tied steps among the id's candidates.
    pub candidates: Vec<usize>,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub id: String,
    /// Tags whose combinations were enumerated.
    pub tags: Vec<String>,
    /// True when referenced tags beyond `MAX_LINT_TAGS` were left out.
    pub truncated: bool,
    /// Held-tag sets for which no step matches.
    pub gaps: Vec<Vec<String>>,
    pub ambiguities: Vec<Ambiguity>,
}

impl CoverageReport {
    pub fn is_clean(&self) -> bool {
        self.gaps.is_empty() && self.ambiguities.is_empty()
    }
}

/// Runs coverage checks against a library.
pub struct CoverageLint<'l> {
    library: &'l ContentLibrary,
    matcher: StepMatcher,
}

impl<'l> CoverageLint<'l> {
    pub fn new(library: &'l ContentLibrary, config: &EngineConfig) -> Self {
        Self {
            library,
            matcher: StepMatcher::new(config),
        }
    }

    /// Tag names referenced by the player conditions of an id's candidates.
    pub fn referenced_tags(&self, id: &str) -> BTreeSet<String> {
        self.library
            .steps_for(id)
            .flat_map(|step| step.conditions())
            .map(|token| token.name.clone())
            .collect()
    }

    /// Check one id.
    ///
    /// Each tag is tried held once or not at all, so count comparisons are
    /// only exercised at 0 and 1.
    pub fn check_id(&self, id: &str) -> CoverageReport {
        let referenced = self.referenced_tags(id);
        let truncated = referenced.len() > MAX_LINT_TAGS;
        let tags: Vec<String> = referenced.into_iter().take(MAX_LINT_TAGS).collect();

        let mut gaps = Vec::new();
        let mut ambiguities = Vec::new();

        for mask in 0u32..(1 << tags.len()) {
            let held: Vec<String> = tags
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, tag)| tag.clone())
                .collect();
            let state = PlayerState::new().with_tags(held.iter().cloned());

            let result = self.matcher.evaluate(id, &state, self.library.steps_for(id));
            if result.is_gap() {
                gaps.push(held);
                continue;
            }

            let best = result.best();
            if best.len() > 1 {
                ambiguities.push(Ambiguity {
                    held,
                    candidates: best.iter().map(|s| s.index).collect(),
                    score: best[0].score,
                });
            }
        }

        tracing::debug!(
            id,
            tags = tags.len(),
            gaps = gaps.len(),
            ambiguities = ambiguities.len(),
            "coverage checked"
        );

        CoverageReport {
            id: id.to_string(),
            tags,
            truncated,
            gaps,
            ambiguities,
        }
    }

    /// Check every id in the library.
    pub fn check_all(&self) -> Vec<CoverageReport> {
        self.library.ids().into_iter().map(|id| self.check_id(id)).collect()
    }
}
