//! Character sheet - named attributes used as skill-check sources.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A modifier on one attribute, optionally active only while a tag is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeModifier {
    pub attribute: String,
    pub amount: i32,
    /// None = always active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub while_tag: Option<String>,
}

impl AttributeModifier {
    pub fn new(attribute: impl Into<String>, amount: i32) -> Self {
        Self {
            attribute: attribute.into(),
            amount,
            while_tag: None,
        }
    }

    /// Only apply while the player holds `tag`.
    pub fn while_holding(mut self, tag: impl Into<String>) -> Self {
        self.while_tag = Some(tag.into());
        self
    }
}

/// Attribute values plus the modifiers layered on top of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    #[serde(default)]
    pub attributes: BTreeMap<String, i32>,
    #[serde(default)]
    pub modifiers: Vec<AttributeModifier>,
}

impl CharacterSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a base attribute value.
    pub fn with_attribute(mut self, name: impl Into<String>, value: i32) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_modifier(mut self, modifier: AttributeModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    fn base_value(&self, name: &str) -> Option<i32> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    /// Current value of an attribute: base plus every active modifier.
    ///
    /// `holds` reports whether the player currently has a tag.
    pub fn effective_value(&self, name: &str, holds: impl Fn(&str) -> bool) -> Option<i32> {
        let base = self.base_value(name)?;
        let bonus: i32 = self
            .modifiers
            .iter()
            .filter(|m| m.attribute.eq_ignore_ascii_case(name))
            .filter(|m| m.while_tag.as_deref().map_or(true, |tag| holds(tag)))
            .map(|m| m.amount)
            .sum();
        Some(base + bonus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_value_applies_active_modifiers() {
        let sheet = CharacterSheet::new()
            .with_attribute("Might", 3)
            .with_modifier(AttributeModifier::new("might", 1))
            .with_modifier(AttributeModifier::new("might", 2).while_holding("inv:gauntlets"));

        assert_eq!(sheet.effective_value("might", |_| false), Some(4));
        assert_eq!(sheet.effective_value("might", |t| t == "inv:gauntlets"), Some(6));
    }

    #[test]
    fn test_unknown_attribute() {
        let sheet = CharacterSheet::new().with_attribute("wits", 2);
        assert_eq!(sheet.effective_value("Wits", |_| false), Some(2));
        assert_eq!(sheet.effective_value("grace", |_| true), None);
    }
}
