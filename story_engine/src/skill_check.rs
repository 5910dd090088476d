//! Skill checks - a bounded die roll plus source bonuses against a DC.

use rand::Rng;
use story_rules::{PlayerState, SkillBonus, SkillCheck};

use crate::config::EngineConfig;

/// Rolls skill checks for a player.
#[derive(Debug, Clone, Copy)]
pub struct SkillResolver<'c> {
    config: &'c EngineConfig,
}

impl<'c> SkillResolver<'c> {
    pub fn new(config: &'c EngineConfig) -> Self {
        Self { config }
    }

    /// Bonus from each named source.
    ///
    /// A name matching a character attribute contributes that attribute's
    /// current value; any other name is a tag worth a fixed amount per copy.
    pub fn bonuses(&self, sources: &[String], state: &PlayerState) -> Vec<SkillBonus> {
        sources
            .iter()
            .map(|name| match state.attribute(name) {
                Some(value) => SkillBonus::attribute(name.clone(), value),
                None => SkillBonus::tag(name.clone(), state.count(name), self.config.tag_bonus_per_copy),
            })
            .collect()
    }

    /// Draw a roll uniformly from `1..=die_sides`.
    pub fn roll_die<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(1..=self.config.die_sides.max(1))
    }

    /// Resolve a check with an already-known roll.
    pub fn resolve_with_roll(&self, roll: u32, sources: &[String], dc: i32, state: &PlayerState) -> SkillCheck {
        let check = SkillCheck::resolve(roll, self.bonuses(sources, state), dc);
        tracing::debug!(
            roll = check.roll,
            total = check.total,
            dc = check.dc,
            success = check.success,
            "skill check resolved"
        );
        check
    }

    /// Roll and resolve a check.
    pub fn roll<R: Rng + ?Sized>(
        &self,
        sources: &[String],
        dc: i32,
        state: &PlayerState,
        rng: &mut R,
    ) -> SkillCheck {
        let roll = self.roll_die(rng);
        self.resolve_with_roll(roll, sources, dc, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use story_rules::{AttributeModifier, BonusSource, CharacterSheet};

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_stat_bonus_success_and_failure() {
        let config = EngineConfig::default();
        let resolver = SkillResolver::new(&config);

        let state = PlayerState::new().with_character(CharacterSheet::new().with_attribute("might", 5));
        let check = resolver.resolve_with_roll(4, &skills(&["might"]), 8, &state);
        assert_eq!(check.total, 9);
        assert!(check.success);

        let state = PlayerState::new().with_character(CharacterSheet::new().with_attribute("might", 2));
        let check = resolver.resolve_with_roll(1, &skills(&["might"]), 8, &state);
        assert_eq!(check.total, 3);
        assert!(!check.success);
    }

    #[test]
    fn test_attribute_modifiers_count() {
        let config = EngineConfig::default();
        let resolver = SkillResolver::new(&config);
        let sheet = CharacterSheet::new()
            .with_attribute("grace", 1)
            .with_modifier(AttributeModifier::new("grace", 2).while_holding("inv:boots"));
        let state = PlayerState::new().with_tags(["inv:boots"]).with_character(sheet);

        let bonuses = resolver.bonuses(&skills(&["grace"]), &state);
        assert_eq!(bonuses[0].amount, 3);
    }

    #[test]
    fn test_tag_sources_pay_per_copy() {
        let config = EngineConfig::default();
        let resolver = SkillResolver::new(&config);
        let state = PlayerState::new().with_tags(["trait:strong", "trait:strong"]);

        let bonuses = resolver.bonuses(&skills(&["trait:strong", "trait:lucky"]), &state);
        assert_eq!(bonuses[0].amount, 4);
        assert_eq!(bonuses[1].amount, 0);
        assert!(matches!(bonuses[1].source, BonusSource::Tag { copies: 0, .. }));
    }

    #[test]
    fn test_rolls_stay_in_bounds() {
        let config = EngineConfig::default();
        let resolver = SkillResolver::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..200 {
            let roll = resolver.roll_die(&mut rng);
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn test_seeded_rolls_are_reproducible() {
        let config = EngineConfig::default();
        let resolver = SkillResolver::new(&config);
        let state = PlayerState::new();
        let sources = skills(&["might"]);

        let a = resolver.roll(&sources, 4, &state, &mut ChaCha8Rng::seed_from_u64(9));
        let b = resolver.roll(&sources, 4, &state, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
