//! Require/forbid/comparison evaluation shared by the matcher, the patch
//! composer and option availability.

use story_rules::{PlayerState, Step, TagToken};

/// Evaluate one condition against a held count.
///
/// Without a comparison the test is "at least one copy"; with one it is the
/// comparison itself. Forbid operators negate the test.
pub fn holds(token: &TagToken, count: u32) -> bool {
    let test = match token.comparison {
        Some(comparison) => comparison.holds(count),
        None => count > 0,
    };
    if token.operator.is_negated() {
        !test
    } else {
        test
    }
}

/// Whether every player condition in `tokens` passes. Non-condition tokens are skipped.
pub fn player_conditions_hold<'a>(
    tokens: impl IntoIterator<Item = &'a TagToken>,
    state: &PlayerState,
) -> bool {
    tokens
        .into_iter()
        .filter(|t| t.is_player_condition())
        .all(|t| holds(t, state.count(&t.name)))
}

/// Whether every base condition in `tokens` passes against `base`'s own tag names.
pub fn base_conditions_hold<'a>(tokens: impl IntoIterator<Item = &'a TagToken>, base: &Step) -> bool {
    tokens
        .into_iter()
        .filter(|t| t.is_base_condition())
        .all(|t| holds(t, base.own_tag_count(&t.name)))
}
