//! Authoring shorthand accepted at the deserialization boundary.
//!
//! Every shape here is normalised into the canonical records in the parent
//! module straight away; nothing past deserialization sees raw shorthand.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{StepOption, VarDecl};
use crate::tags::TagToken;

/// Separator between label and target in `"Label::target"`.
pub const OPTION_TARGET_SEPARATOR: &str = "::";

/// An option as authored: `"Label::target"`, `"Label"`, or a full record.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawOption {
    Shorthand(String),
    Record(OptionRecord),
}

#[derive(Deserialize)]
pub struct OptionRecord {
    label: String,
    #[serde(default)]
    tags: Vec<TagToken>,
    #[serde(default)]
    skill: Option<SkillNames>,
    #[serde(default)]
    dc: Option<i32>,
    #[serde(default)]
    pass: Option<String>,
    #[serde(default)]
    fail: Option<String>,
    #[serde(default)]
    hidden: bool,
}

/// `"skill": "might"` or `"skill": ["might", "trait:strong"]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SkillNames {
    One(String),
    Many(Vec<String>),
}

impl From<SkillNames> for Vec<String> {
    fn from(names: SkillNames) -> Self {
        match names {
            SkillNames::One(name) => vec![name],
            SkillNames::Many(names) => names,
        }
    }
}

impl From<RawOption> for StepOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Shorthand(text) => StepOption::from_shorthand(&text),
            RawOption::Record(record) => StepOption {
                label: record.label,
                tags: record.tags,
                skill: record.skill.map(Vec::from).unwrap_or_default(),
                dc: record.dc,
                pass: record.pass.filter(|p| !p.trim().is_empty()),
                fail: record.fail.filter(|f| !f.trim().is_empty()),
                hidden: record.hidden,
            },
        }
    }
}

/// Choices for a variable: one value, a list of values, or a list of field objects.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawVarChoices {
    One(String),
    Values(Vec<String>),
    Entities(Vec<BTreeMap<String, String>>),
}

impl From<Option<RawVarChoices>> for VarDecl {
    fn from(raw: Option<RawVarChoices>) -> Self {
        match raw {
            None => VarDecl::Clear,
            Some(RawVarChoices::One(value)) => VarDecl::Pick(vec![value]),
            Some(RawVarChoices::Values(values)) => VarDecl::Pick(values),
            Some(RawVarChoices::Entities(entities)) => VarDecl::PickEntity(entities),
        }
    }
}

impl From<VarDecl> for Option<RawVarChoices> {
    fn from(decl: VarDecl) -> Self {
        match decl {
            VarDecl::Clear => None,
            VarDecl::Pick(values) => Some(RawVarChoices::Values(values)),
            VarDecl::PickEntity(entities) => Some(RawVarChoices::Entities(entities)),
        }
    }
}
