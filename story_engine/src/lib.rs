//! # Story Engine
//!
//! The rule engine of a tag-driven narrative game. Given a player's tag state
//! it picks the most appropriate step for a location, layers authored patches
//! over it, applies its effects, and resolves the options the player picks.
//!
//! ## Core Components
//!
//! - **matcher**: Hard-filters candidate steps and breaks ties by soft score
//! - **patches**: Composes conditional text/option/variable/tag contributions
//! - **executor**: Applies tag mutations and variables, appends the log
//! - **options**: Option availability, ignoring internal tags
//! - **skill_check**: Die roll plus attribute/tag bonuses against a DC
//! - **render**: `{{var}}` templates with pronoun derivation
//! - **session**: The visit/choose turn flow over a content library
//! - **lint**: Coverage gaps and ambiguities without executing anything
//!
//! ## Design Philosophy
//!
//! - **Deterministic when seeded**: every random draw goes through one injected `Rng`
//! - **Forgiving content**: malformed tokens degrade to literal requires, gaps are outcomes
//! - **Immutable content**: patches compose new values and never touch stored steps

pub mod conditions;
pub mod config;
pub mod error;
pub mod executor;
pub mod library;
pub mod lint;
pub mod matcher;
pub mod options;
pub mod patches;
pub mod render;
pub mod session;
pub mod skill_check;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use executor::{AppliedMutation, Execution, StepExecutor};
pub use library::{ContentLibrary, DanglingReference, ReferenceSite};
pub use lint::{Ambiguity, CoverageLint, CoverageReport};
pub use matcher::{MatchResult, ScoredStep, StepMatcher};
pub use options::{OptionGate, OptionState};
pub use patches::PatchComposer;
pub use render::render;
pub use session::{Choice, OptionView, Scene, Session, Visit};
pub use skill_check::SkillResolver;
