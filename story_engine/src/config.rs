//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Tunables shared by every engine component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Score added for each satisfied `@` token.
    pub preferred_tag_weight: i32,

    /// The singleton tag whose consumption ends a quest.
    pub quest_tag: String,

    /// Prefix of quest-scoped tags, purged when `quest_tag` is consumed.
    pub quest_prefix: String,

    /// Prefix of internal/system tags, never used to gate options.
    pub internal_prefix: String,

    /// Ids with this prefix name patches and may never be patch targets.
    pub patch_prefix: String,

    /// Log entries kept; the oldest are dropped.
    pub log_capacity: usize,

    /// Skill rolls are uniform over `1..=die_sides`.
    pub die_sides: u32,

    /// Skill bonus per copy of a tag source.
    pub tag_bonus_per_copy: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preferred_tag_weight: 5,
            quest_tag: "quest".to_string(),
            quest_prefix: "q:".to_string(),
            internal_prefix: "_".to_string(),
            patch_prefix: "patch:".to_string(),
            log_capacity: 100,
            die_sides: 6,
            tag_bonus_per_copy: 2,
        }
    }
}

impl EngineConfig {
    /// Parse from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Whether a tag name is internal bookkeeping.
    pub fn is_internal(&self, tag: &str) -> bool {
        !self.internal_prefix.is_empty() && tag.starts_with(&self.internal_prefix)
    }
}
