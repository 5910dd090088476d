//! Tag model - operators, count comparisons and raw token parsing.
//!
//! A raw token is an optional operator prefix, a tag name, and for conditions
//! an optional count comparison:
//! - `name` / `@name` - require (the `@` form also scores as preferred)
//! - `!name` - forbid
//! - `+name` / `-name` - grant / consume
//! - `^name` / `^!name` - require / forbid on a patched step's own tags
//! - `name=3`, `@name>2`, `!name<1` - compare against the held count

mod operator;
mod token;

pub use operator::*;
pub use token::*;
