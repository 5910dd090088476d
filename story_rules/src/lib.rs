//! # Story Rules
//!
//! The rulebook crate - tag tokens, player state, content records and skill
//! mechanics. Everything here is plain data plus the pure functions over it;
//! selection, composition and execution live in `story_engine`.
//!
//! ## Core Components
//!
//! - **tags**: Operator/name/comparison triples parsed from raw tokens
//! - **player**: The tag multiset, variables, log and character sheet
//! - **content**: Steps, options and patches, with authoring shorthand
//! - **mechanics**: Skill-check bonuses and resolution

pub mod content;
pub mod error;
pub mod mechanics;
pub mod player;
pub mod tags;

pub use content::*;
pub use error::*;
pub use mechanics::*;
pub use player::*;
pub use tags::*;
