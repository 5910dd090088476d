//! Content records: steps, their options, and the patches that extend them.
//!
//! Content is loaded once per session and never mutated afterwards. Patches
//! are applied at evaluation time by composing a new step value.

mod shorthand;

pub use shorthand::OPTION_TARGET_SEPARATOR;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ContentError, ContentResult};
use crate::tags::TagToken;

/// A variable declaration on a step or patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<shorthand::RawVarChoices>", into = "Option<shorthand::RawVarChoices>")]
pub enum VarDecl {
    /// Delete the variable and its fields.
    Clear,
    /// Store one of these values, chosen uniformly.
    Pick(Vec<String>),
    /// Store each field of one of these objects under `name.field`.
    PickEntity(Vec<BTreeMap<String, String>>),
}

/// A scripted unit bound to a location id or an internal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,

    /// Conditions and mutations, in authored order.
    #[serde(default)]
    pub tags: Vec<TagToken>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, VarDecl>,

    /// Display text template.
    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<StepOption>,

    /// Log line template, rendered after variables resolve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
}

impl Step {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: Vec::new(),
            vars: BTreeMap::new(),
            text: text.into(),
            options: Vec::new(),
            log: None,
        }
    }

    /// Add a raw tag token such as `"!met-guard"` or `"+inv:rope"`.
    pub fn with_tag(mut self, raw: &str) -> Self {
        self.tags.push(TagToken::parse(raw));
        self
    }

    pub fn with_tags<'a>(mut self, raw: impl IntoIterator<Item = &'a str>) -> Self {
        self.tags.extend(raw.into_iter().map(TagToken::parse));
        self
    }

    pub fn with_var(mut self, name: impl Into<String>, decl: VarDecl) -> Self {
        self.vars.insert(name.into(), decl);
        self
    }

    pub fn with_option(mut self, option: StepOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_log(mut self, log: impl Into<String>) -> Self {
        self.log = Some(log.into());
        self
    }

    /// Case-insensitive id comparison.
    pub fn has_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }

    /// Tokens that gate selection against the player.
    pub fn conditions(&self) -> impl Iterator<Item = &TagToken> {
        self.tags.iter().filter(|t| t.is_player_condition())
    }

    /// Grant and consume tokens.
    pub fn mutations(&self) -> impl Iterator<Item = &TagToken> {
        self.tags.iter().filter(|t| t.is_mutation())
    }

    /// How many of this step's own tokens name `tag`, whatever their operator.
    pub fn own_tag_count(&self, tag: &str) -> u32 {
        self.tags.iter().filter(|t| t.name == tag).count() as u32
    }

    /// Check structural rules for this step and its options.
    pub fn validate(&self, index: usize) -> ContentResult<()> {
        if self.id.trim().is_empty() {
            return Err(ContentError::EmptyStepId { index });
        }
        for option in &self.options {
            option.validate(&self.id)?;
        }
        Ok(())
    }
}

/// A choice offered by a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "shorthand::RawOption")]
pub struct StepOption {
    /// Label template.
    pub label: String,

    /// Require/forbid gate visibility; grant/consume apply on selection.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagToken>,

    /// Attribute or tag names whose bonuses feed the check.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skill: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc: Option<i32>,

    /// Target on success, or when there is no check. None ends the interaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,

    /// Target on a failed check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail: Option<String>,

    /// Hide entirely unless available, instead of showing it disabled.
    pub hidden: bool,
}

impl StepOption {
    /// An option that ends the interaction.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tags: Vec::new(),
            skill: Vec::new(),
            dc: None,
            pass: None,
            fail: None,
            hidden: false,
        }
    }

    /// Expand `"Label::target"` (or a bare `"Label"`) into a full option.
    pub fn from_shorthand(text: &str) -> Self {
        match text.split_once(OPTION_TARGET_SEPARATOR) {
            Some((label, target)) => {
                let target = target.trim();
                let mut option = Self::new(label.trim());
                if !target.is_empty() {
                    option.pass = Some(target.to_string());
                }
                option
            }
            None => Self::new(text.trim()),
        }
    }

    pub fn with_tag(mut self, raw: &str) -> Self {
        self.tags.push(TagToken::parse(raw));
        self
    }

    pub fn with_pass(mut self, target: impl Into<String>) -> Self {
        self.pass = Some(target.into());
        self
    }

    /// Attach a skill check with its fail target.
    pub fn with_check(
        mut self,
        skills: impl IntoIterator<Item = impl Into<String>>,
        dc: i32,
        fail: impl Into<String>,
    ) -> Self {
        self.skill = skills.into_iter().map(Into::into).collect();
        self.dc = Some(dc);
        self.fail = Some(fail.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn has_skill_check(&self) -> bool {
        !self.skill.is_empty()
    }

    pub fn mutations(&self) -> impl Iterator<Item = &TagToken> {
        self.tags.iter().filter(|t| t.is_mutation())
    }

    fn validate(&self, step: &str) -> ContentResult<()> {
        if !self.has_skill_check() {
            return Ok(());
        }
        if self.fail.is_none() {
            return Err(ContentError::SkillWithoutFail {
                step: step.to_string(),
                label: self.label.clone(),
            });
        }
        if self.dc.is_none() {
            return Err(ContentError::SkillWithoutDc {
                step: step.to_string(),
                label: self.label.clone(),
            });
        }
        Ok(())
    }
}

/// Text contributed by a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<String>,
}

/// A conditional augmentation of the steps sharing `target` as their id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub target: String,

    /// `require`/`forbid` test the player, `base-require`/`base-forbid` test
    /// the target step's own tags, `grant`/`consume` are carried onto the
    /// composed step.
    #[serde(default)]
    pub tags: Vec<TagToken>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextPatch>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<StepOption>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, VarDecl>,
}

impl Patch {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            tags: Vec::new(),
            text: None,
            options: Vec::new(),
            vars: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, raw: &str) -> Self {
        self.tags.push(TagToken::parse(raw));
        self
    }

    pub fn prepend(mut self, text: impl Into<String>) -> Self {
        self.text.get_or_insert_with(TextPatch::default).prepend = Some(text.into());
        self
    }

    pub fn append(mut self, text: impl Into<String>) -> Self {
        self.text.get_or_insert_with(TextPatch::default).append = Some(text.into());
        self
    }

    pub fn replace(mut self, text: impl Into<String>) -> Self {
        self.text.get_or_insert_with(TextPatch::default).replace = Some(text.into());
        self
    }

    pub fn with_option(mut self, option: StepOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_var(mut self, name: impl Into<String>, decl: VarDecl) -> Self {
        self.vars.insert(name.into(), decl);
        self
    }

    pub fn targets(&self, id: &str) -> bool {
        self.target.eq_ignore_ascii_case(id)
    }

    /// Player-side conditions.
    pub fn player_conditions(&self) -> impl Iterator<Item = &TagToken> {
        self.tags.iter().filter(|t| t.is_player_condition())
    }

    /// Conditions on the target step's own tags.
    pub fn base_conditions(&self) -> impl Iterator<Item = &TagToken> {
        self.tags.iter().filter(|t| t.is_base_condition())
    }

    pub fn mutations(&self) -> impl Iterator<Item = &TagToken> {
        self.tags.iter().filter(|t| t.is_mutation())
    }

    /// Check structural rules. Ids starting with `patch_prefix` name patches and may not be targeted.
    pub fn validate(&self, index: usize, patch_prefix: &str) -> ContentResult<()> {
        let target = self.target.trim();
        if target.is_empty() {
            return Err(ContentError::EmptyPatchTarget { index });
        }
        if !patch_prefix.is_empty() && target.to_ascii_lowercase().starts_with(&patch_prefix.to_ascii_lowercase()) {
            return Err(ContentError::PatchTargetsPatch {
                index,
                target: self.target.clone(),
            });
        }
        for option in &self.options {
            option.validate(&self.target)?;
        }
        Ok(())
    }
}

/// The interchange shape handed over by a content provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPack {
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub patches: Vec<Patch>,
}
