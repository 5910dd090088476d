//! Game mechanics: skill-check sources, bonuses and resolution.

use serde::{Deserialize, Serialize};

/// Where a skill bonus came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusSource {
    /// A character attribute at its current (modified) value.
    Attribute(String),
    /// A tag, contributing a fixed amount per copy held.
    Tag { name: String, copies: u32 },
}

/// One source's contribution to a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBonus {
    pub source: BonusSource,
    pub amount: i32,
}

impl SkillBonus {
    pub fn attribute(name: impl Into<String>, value: i32) -> Self {
        Self {
            source: BonusSource::Attribute(name.into()),
            amount: value,
        }
    }

    pub fn tag(name: impl Into<String>, copies: u32, per_copy: i32) -> Self {
        Self {
            source: BonusSource::Tag {
                name: name.into(),
                copies,
            },
            amount: copies as i32 * per_copy,
        }
    }
}

/// Outcome of a skill check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheck {
    pub roll: u32,
    pub bonuses: Vec<SkillBonus>,
    pub total: i32,
    pub dc: i32,
    pub success: bool,
}

impl SkillCheck {
    /// Resolve a check from an already-drawn roll. Succeeds on `total >= dc`.
    pub fn resolve(roll: u32, bonuses: Vec<SkillBonus>, dc: i32) -> Self {
        let total = roll as i32 + bonuses.iter().map(|b| b.amount).sum::<i32>();
        Self {
            roll,
            bonuses,
            total,
            dc,
            success: total >= dc,
        }
    }

    /// Sum of all bonuses.
    pub fn total_bonus(&self) -> i32 {
        self.total - self.roll as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_success() {
        let check = SkillCheck::resolve(4, vec![SkillBonus::attribute("might", 5)], 8);
        assert_eq!(check.total, 9);
        assert!(check.success);
        assert_eq!(check.total_bonus(), 5);
    }

    #[test]
    fn test_resolve_failure() {
        let check = SkillCheck::resolve(1, vec![SkillBonus::attribute("might", 2)], 8);
        assert_eq!(check.total, 3);
        assert!(!check.success);
    }

    #[test]
    fn test_meeting_dc_exactly_succeeds() {
        let check = SkillCheck::resolve(
            2,
            vec![SkillBonus::attribute("wits", 1), SkillBonus::tag("trait:sharp", 2, 2)],
            7,
        );
        assert_eq!(check.total, 7);
        assert!(check.success);
    }

    #[test]
    fn test_tag_bonus_scales_with_copies() {
        let bonus = SkillBonus::tag("inv:lockpick", 3, 2);
        assert_eq!(bonus.amount, 6);
        assert!(matches!(bonus.source, BonusSource::Tag { copies: 3, .. }));
    }
}
