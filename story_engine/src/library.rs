//! Content library - the immutable steps and patches for one session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use story_rules::{ContentPack, Patch, Step, StepOption};

use crate::config::EngineConfig;
use crate::error::EngineResult;

/// Where a reference to a missing id was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceSite {
    OptionPass { step: String, label: String },
    OptionFail { step: String, label: String },
    PatchTarget { index: usize },
    PatchOptionPass { index: usize, label: String },
    PatchOptionFail { index: usize, label: String },
}

/// A reference to an id no step carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingReference {
    pub missing: String,
    pub site: ReferenceSite,
}

/// Validated, indexed content.
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    steps: Vec<Step>,
    patches: Vec<Patch>,
    /// Lower-cased id -> positions in `steps`.
    by_id: HashMap<String, Vec<usize>>,
}

impl ContentLibrary {
    /// Validate and index a content pack.
    ///
    /// Structural errors reject the pack. Dangling references are only warned
    /// about; they fail soft if reached during play.
    pub fn new(pack: ContentPack, config: &EngineConfig) -> EngineResult<Self> {
        for (index, step) in pack.steps.iter().enumerate() {
            step.validate(index)?;
        }
        for (index, patch) in pack.patches.iter().enumerate() {
            patch.validate(index, &config.patch_prefix)?;
        }

        let mut by_id: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, step) in pack.steps.iter().enumerate() {
            by_id.entry(step.id.to_ascii_lowercase()).or_default().push(index);
        }

        let library = Self {
            steps: pack.steps,
            patches: pack.patches,
            by_id,
        };

        for reference in library.dangling_references() {
            tracing::warn!(missing = %reference.missing, site = ?reference.site, "dangling content reference");
        }

        Ok(library)
    }

    /// Parse a JSON content pack, then validate it.
    pub fn from_json_str(json: &str, config: &EngineConfig) -> EngineResult<Self> {
        let pack: ContentPack = serde_json::from_str(json)?;
        Self::new(pack, config)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Whether any step carries this id (case-insensitive).
    pub fn has_id(&self, id: &str) -> bool {
        self.by_id.contains_key(&id.to_ascii_lowercase())
    }

    /// Every step sharing an id.
    pub fn steps_for<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Step> + 'a {
        self.by_id
            .get(&id.to_ascii_lowercase())
            .into_iter()
            .flatten()
            .map(move |&index| &self.steps[index])
    }

    /// Patches targeting an id, in load order.
    pub fn patches_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Patch> + 'a {
        self.patches.iter().filter(move |p| p.targets(id))
    }

    /// Distinct ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .by_id
            .values()
            .filter_map(|indices| indices.first())
            .map(|&index| self.steps[index].id.as_str())
            .collect();
        ids.sort_unstable_by_key(|id| id.to_ascii_lowercase());
        ids
    }

    /// References to ids no step carries, including those on patch-contributed options.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();

        for step in &self.steps {
            for option in &step.options {
                self.check_option(option, &mut dangling, |label, fail| {
                    let (step, label) = (step.id.clone(), label.to_string());
                    if fail {
                        ReferenceSite::OptionFail { step, label }
                    } else {
                        ReferenceSite::OptionPass { step, label }
                    }
                });
            }
        }

        for (index, patch) in self.patches.iter().enumerate() {
            if !self.has_id(&patch.target) {
                dangling.push(DanglingReference {
                    missing: patch.target.clone(),
                    site: ReferenceSite::PatchTarget { index },
                });
            }
            for option in &patch.options {
                self.check_option(option, &mut dangling, |label, fail| {
                    let label = label.to_string();
                    if fail {
                        ReferenceSite::PatchOptionFail { index, label }
                    } else {
                        ReferenceSite::PatchOptionPass { index, label }
                    }
                });
            }
        }

        dangling
    }

    /// Record an option's missing `pass`/`fail` targets. `site` gets the label and whether it is the fail target.
    fn check_option(
        &self,
        option: &StepOption,
        dangling: &mut Vec<DanglingReference>,
        site: impl Fn(&str, bool) -> ReferenceSite,
    ) {
        let targets = [(option.pass.as_deref(), false), (option.fail.as_deref(), true)];
        for (target, fail) in targets {
            if let Some(missing) = target.filter(|id| !self.has_id(id)) {
                dangling.push(DanglingReference {
                    missing: missing.to_string(),
                    site: site(&option.label, fail),
                });
            }
        }
    }
}
