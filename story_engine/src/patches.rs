//! Patch composer - layers applicable patches over a base step.
//!
//! Patches never mutate stored content. Composition builds a new step value:
//! prepends and appends wrap the base text in patch order, any `replace` wins
//! outright (the last one in order), options and grant/consume tokens are
//! appended, and variable declarations override by name with later patches
//! winning. Patches never condition on one another.

use std::borrow::Cow;
use story_rules::{Patch, PlayerState, Step};

use crate::conditions;
use crate::config::EngineConfig;

/// Composes base steps with the patches targeting them.
#[derive(Debug, Clone)]
pub struct PatchComposer {
    patch_prefix: String,
}

impl PatchComposer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            patch_prefix: config.patch_prefix.to_ascii_lowercase(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&EngineConfig::default())
    }

    fn targets_patch(&self, patch: &Patch) -> bool {
        !self.patch_prefix.is_empty() && patch.target.to_ascii_lowercase().starts_with(&self.patch_prefix)
    }

    /// Whether a single patch applies to `base` for this player.
    pub fn applies(&self, patch: &Patch, base: &Step, state: &PlayerState) -> bool {
        patch.targets(&base.id)
            && !self.targets_patch(patch)
            && conditions::player_conditions_hold(&patch.tags, state)
            && conditions::base_conditions_hold(&patch.tags, base)
    }

    /// Applicable patches for `base`, in input order.
    pub fn applicable<'p>(
        &self,
        base: &Step,
        patches: impl IntoIterator<Item = &'p Patch>,
        state: &PlayerState,
    ) -> Vec<&'p Patch> {
        patches
            .into_iter()
            .filter(|patch| {
                let applies = self.applies(patch, base, state);
                if !applies && patch.targets(&base.id) {
                    tracing::trace!(target_id = %patch.target, "patch dropped");
                }
                applies
            })
            .collect()
    }

    /// Compose `base` with every applicable patch.
    ///
    /// Returns the base step borrowed, untouched, when nothing applies.
    pub fn compose<'s, 'p>(
        &self,
        base: &'s Step,
        patches: impl IntoIterator<Item = &'p Patch>,
        state: &PlayerState,
    ) -> Cow<'s, Step> {
        let applicable = self.applicable(base, patches, state);
        if applicable.is_empty() {
            return Cow::Borrowed(base);
        }

        let mut composed = base.clone();
        let mut prepends = String::new();
        let mut appends = String::new();
        let mut replacement: Option<&str> = None;

        for patch in &applicable {
            if let Some(text) = &patch.text {
                if let Some(prepend) = &text.prepend {
                    prepends.push_str(prepend);
                }
                if let Some(append) = &text.append {
                    appends.push_str(append);
                }
                if let Some(replace) = &text.replace {
                    replacement = Some(replace.as_str());
                }
            }

            composed.options.extend(patch.options.iter().cloned());
            composed
                .vars
                .extend(patch.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
            composed.tags.extend(patch.mutations().cloned());
        }

        composed.text = match replacement {
            Some(replace) => replace.to_string(),
            None => format!("{}{}{}", prepends, base.text, appends),
        };

        tracing::debug!(
            id = %base.id,
            applied = applicable.len(),
            replaced = replacement.is_some(),
            "patches composed"
        );

        Cow::Owned(composed)
    }
}
