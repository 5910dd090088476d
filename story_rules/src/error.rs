//! Structural content errors, detected when content is loaded.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Step #{index} has an empty id")]
    EmptyStepId { index: usize },

    #[error("Patch #{index} has an empty target")]
    EmptyPatchTarget { index: usize },

    #[error("Patch #{index} targets another patch: {target}")]
    PatchTargetsPatch { index: usize, target: String },

    #[error("Option '{label}' on step '{step}' has a skill check but no fail target")]
    SkillWithoutFail { step: String, label: String },

    #[error("Option '{label}' on step '{step}' has a skill check but no DC")]
    SkillWithoutDc { step: String, label: String },
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;
