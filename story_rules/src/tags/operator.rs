//! Tag operators and count comparisons.

use serde::{Deserialize, Serialize};

/// The operator carried by a tag token in a definition context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagOperator {
    /// Bare token: the player must hold the tag.
    Require,
    /// `@` token: a requirement that also scores as a preferred tag.
    RequireExplicit,
    /// `!` token: the player must not hold the tag.
    Forbid,
    /// `+` token: add one copy on execution.
    Grant,
    /// `-` token: remove one copy on execution.
    Consume,
    /// `^` token: the patched step's own tag list must name the tag.
    BaseRequire,
    /// `^!` token: the patched step's own tag list must not name the tag.
    BaseForbid,
}

impl TagOperator {
    /// Prefixed operators in match order. `^!` precedes `^`.
    const PREFIXED: [(&'static str, TagOperator); 6] = [
        ("^!", TagOperator::BaseForbid),
        ("^", TagOperator::BaseRequire),
        ("@", TagOperator::RequireExplicit),
        ("!", TagOperator::Forbid),
        ("+", TagOperator::Grant),
        ("-", TagOperator::Consume),
    ];

    /// Split a raw token into its operator and the remaining text.
    pub fn split(raw: &str) -> (TagOperator, &str) {
        Self::PREFIXED
            .iter()
            .find_map(|(prefix, op)| raw.strip_prefix(prefix).map(|rest| (*op, rest)))
            .unwrap_or((TagOperator::Require, raw))
    }

    /// The textual prefix for this operator (empty for a bare require).
    pub fn prefix(&self) -> &'static str {
        match self {
            TagOperator::Require => "",
            TagOperator::RequireExplicit => "@",
            TagOperator::Forbid => "!",
            TagOperator::Grant => "+",
            TagOperator::Consume => "-",
            TagOperator::BaseRequire => "^",
            TagOperator::BaseForbid => "^!",
        }
    }

    /// Conditions checked against the player's tags.
    pub fn is_player_condition(&self) -> bool {
        matches!(
            self,
            TagOperator::Require | TagOperator::RequireExplicit | TagOperator::Forbid
        )
    }

    /// Conditions checked against a patched step's own tag list.
    pub fn is_base_condition(&self) -> bool {
        matches!(self, TagOperator::BaseRequire | TagOperator::BaseForbid)
    }

    /// Grant and consume: effects, never conditions.
    pub fn is_mutation(&self) -> bool {
        matches!(self, TagOperator::Grant | TagOperator::Consume)
    }

    /// Whether the condition passes when its test is false.
    pub fn is_negated(&self) -> bool {
        matches!(self, TagOperator::Forbid | TagOperator::BaseForbid)
    }

    /// Only conditions may carry a count comparison.
    pub fn accepts_comparison(&self) -> bool {
        !self.is_mutation()
    }
}

/// Comparison applied to the count of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Equal,
    Less,
    Greater,
}

impl CompareOp {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '=' => Some(CompareOp::Equal),
            '<' => Some(CompareOp::Less),
            '>' => Some(CompareOp::Greater),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            CompareOp::Equal => '=',
            CompareOp::Less => '<',
            CompareOp::Greater => '>',
        }
    }
}

/// A `<op><integer>` suffix constraining the count of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comparison {
    pub op: CompareOp,
    pub value: u32,
}

impl Comparison {
    pub fn new(op: CompareOp, value: u32) -> Self {
        Self { op, value }
    }

    /// Test a held count against this comparison.
    pub fn holds(&self, count: u32) -> bool {
        match self.op {
            CompareOp::Equal => count == self.value,
            CompareOp::Less => count < self.value,
            CompareOp::Greater => count > self.value,
        }
    }
}
