//! Tag tokens - the unit of every condition and mutation in content.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::{CompareOp, Comparison, TagOperator};

// `<name><op><digits>`; the greedy name leaves only the last operator to split on
static COMPARISON_REGEX: OnceLock<Regex> = OnceLock::new();

/// A parsed tag-definition token such as `!met-guard`, `+inv:rope` or `@coin>2`.
///
/// Tokens (de)serialize as their raw string form so content stays human-authorable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TagToken {
    pub operator: TagOperator,
    pub name: String,
    pub comparison: Option<Comparison>,
}

impl TagToken {
    /// Build a token without a comparison.
    pub fn new(operator: TagOperator, name: impl Into<String>) -> Self {
        Self {
            operator,
            name: name.into(),
            comparison: None,
        }
    }

    pub fn require(name: impl Into<String>) -> Self {
        Self::new(TagOperator::Require, name)
    }

    pub fn forbid(name: impl Into<String>) -> Self {
        Self::new(TagOperator::Forbid, name)
    }

    pub fn grant(name: impl Into<String>) -> Self {
        Self::new(TagOperator::Grant, name)
    }

    pub fn consume(name: impl Into<String>) -> Self {
        Self::new(TagOperator::Consume, name)
    }

    /// Attach a count comparison. Ignored for grant/consume.
    pub fn with_comparison(mut self, op: CompareOp, value: u32) -> Self {
        if self.operator.accepts_comparison() {
            self.comparison = Some(Comparison::new(op, value));
        }
        self
    }

    /// Parse a raw token.
    ///
    /// Never fails: anything that does not fit `<name><op><digits>` after the
    /// operator prefix is kept whole as the tag name. Whitespace is kept as
    /// written; authored content is trimmed by the `From` conversions.
    pub fn parse(raw: &str) -> Self {
        let (operator, rest) = TagOperator::split(raw);

        if operator.accepts_comparison() {
            if let Some((name, comparison)) = split_comparison(rest) {
                return Self {
                    operator,
                    name: name.to_string(),
                    comparison: Some(comparison),
                };
            }
        }

        Self::new(operator, rest)
    }

    /// Format back to the raw token form.
    pub fn format(&self) -> String {
        match self.comparison {
            Some(cmp) => format!(
                "{}{}{}{}",
                self.operator.prefix(),
                self.name,
                cmp.op.symbol(),
                cmp.value
            ),
            None => format!("{}{}", self.operator.prefix(), self.name),
        }
    }

    /// Whether this token is a condition on the player's tags.
    pub fn is_player_condition(&self) -> bool {
        self.operator.is_player_condition()
    }

    pub fn is_base_condition(&self) -> bool {
        self.operator.is_base_condition()
    }

    pub fn is_mutation(&self) -> bool {
        self.operator.is_mutation()
    }
}

/// Split `<name><op><digits>`; the name must be non-empty and the suffix fully numeric.
fn split_comparison(rest: &str) -> Option<(&str, Comparison)> {
    let re = COMPARISON_REGEX.get_or_init(|| {
        Regex::new(r"^(.+)([=<>])(\d+)$").expect("COMPARISON_REGEX pattern is invalid")
    });
    let caps = re.captures(rest)?;

    let name = caps.get(1)?.as_str();
    let op = CompareOp::from_symbol(caps[2].chars().next()?)?;
    let value = caps[3].parse().ok()?;
    Some((name, Comparison::new(op, value)))
}

/// Authored content: surrounding whitespace is not part of the token.
impl From<String> for TagToken {
    fn from(raw: String) -> Self {
        TagToken::parse(raw.trim())
    }
}

impl From<&str> for TagToken {
    fn from(raw: &str) -> Self {
        TagToken::parse(raw.trim())
    }
}

impl From<TagToken> for String {
    fn from(token: TagToken) -> Self {
        token.format()
    }
}

impl std::fmt::Display for TagToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}
