//! Engine errors.
//!
//! Only caller mistakes and load failures are errors. Coverage gaps and
//! dangling references reached during play are ordinary `Visit` outcomes.

use story_rules::ContentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Option index {index} out of range ({available} options)")]
    OptionOutOfRange { index: usize, available: usize },

    #[error("Option '{label}' is not available")]
    OptionUnavailable { label: String },

    #[error("Invalid content: {0}")]
    Content(#[from] ContentError),

    #[error("Content parse error: {0}")]
    ContentParse(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
