//! Player state - the tag multiset, resolved variables and the narrative log.

mod character;

pub use character::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use uuid::Uuid;

/// Unique identifier for one play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the engine mutates during play.
///
/// Tags form a multiset: order is irrelevant, duplicates are counted.
/// Variables are flat; an entity's fields live under dotted keys such as
/// `npc.occupation`. The log is kept newest-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerState {
    #[serde(default)]
    pub session_id: SessionId,

    #[serde(default)]
    tags: Vec<String>,

    #[serde(default)]
    variables: BTreeMap<String, String>,

    #[serde(default)]
    log: VecDeque<String>,

    /// Steps executed so far.
    #[serde(default)]
    pub turn: u64,

    /// Executions per step id (lower-cased).
    #[serde(default)]
    visits: BTreeMap<String, u32>,

    #[serde(default)]
    pub character: CharacterSheet,
}

impl PlayerState {
    /// A fresh state. Also the fallback when a saved state cannot be restored.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given tags held once each (repeat a tag to hold it more).
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_character(mut self, character: CharacterSheet) -> Self {
        self.character = character;
        self
    }

    /// All held tags, one entry per copy.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Number of copies held.
    pub fn count(&self, tag: &str) -> u32 {
        self.tags.iter().filter(|t| t.as_str() == tag).count() as u32
    }

    pub fn has(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add one copy of a tag.
    pub fn grant(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    /// Remove one copy of a tag. Returns false (and changes nothing) if none is held.
    pub fn consume(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => {
                self.tags.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every copy of every tag starting with `prefix`. Returns how many copies went.
    pub fn purge_prefix(&mut self, prefix: &str) -> usize {
        let before = self.tags.len();
        self.tags.retain(|t| !t.starts_with(prefix));
        before - self.tags.len()
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Remove a variable and every `name.field` entry beneath it.
    pub fn clear_variable(&mut self, name: &str) {
        let field_prefix = format!("{}.", name);
        self.variables
            .retain(|key, _| key != name && !key.starts_with(&field_prefix));
    }

    /// Log entries, newest first.
    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    /// The most recent log entry.
    pub fn latest_log(&self) -> Option<&str> {
        self.log.front().map(String::as_str)
    }

    /// Prepend a log entry, dropping the oldest entries beyond `capacity`.
    pub fn push_log(&mut self, entry: impl Into<String>, capacity: usize) {
        self.log.push_front(entry.into());
        self.log.truncate(capacity);
    }

    /// Count one execution of a step id.
    pub fn record_visit(&mut self, id: &str) {
        *self.visits.entry(id.to_ascii_lowercase()).or_default() += 1;
    }

    pub fn visits(&self, id: &str) -> u32 {
        self.visits.get(&id.to_ascii_lowercase()).copied().unwrap_or(0)
    }

    /// Effective attribute value, with tag-conditional modifiers resolved against held tags.
    pub fn attribute(&self, name: &str) -> Option<i32> {
        self.character.effective_value(name, |tag| self.has(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiset_counts() {
        let mut state = PlayerState::new().with_tags(["coin", "coin", "trait:brave"]);
        assert_eq!(state.count("coin"), 2);
        assert_eq!(state.count("trait:brave"), 1);
        assert_eq!(state.count("missing"), 0);

        state.grant("coin");
        assert_eq!(state.count("coin"), 3);
    }

    #[test]
    fn test_consume_removes_single_copy() {
        let mut state = PlayerState::new().with_tags(["coin", "coin"]);
        assert!(state.consume("coin"));
        assert_eq!(state.count("coin"), 1);

        assert!(!state.consume("gem"));
        assert_eq!(state.tags().len(), 1);
    }

    #[test]
    fn test_purge_prefix() {
        let mut state = PlayerState::new().with_tags(["q:a", "q:a", "q:b", "trait:x"]);
        assert_eq!(state.purge_prefix("q:"), 3);
        assert_eq!(state.tags(), ["trait:x".to_string()]);
    }

    #[test]
    fn test_clear_variable_removes_fields() {
        let mut state = PlayerState::new();
        state.set_variable("npc.name", "Mara");
        state.set_variable("npc.gender", "female");
        state.set_variable("npcs", "kept");
        state.set_variable("npc", "flat");

        state.clear_variable("npc");

        assert_eq!(state.variables().len(), 1);
        assert_eq!(state.variable("npcs"), Some("kept"));
    }

    #[test]
    fn test_log_is_newest_first_and_capped() {
        let mut state = PlayerState::new();
        for i in 0..5 {
            state.push_log(format!("entry {}", i), 3);
        }

        let entries: Vec<_> = state.log().collect();
        assert_eq!(entries, ["entry 4", "entry 3", "entry 2"]);
        assert_eq!(state.latest_log(), Some("entry 4"));
    }

    #[test]
    fn test_visits_are_case_insensitive() {
        let mut state = PlayerState::new();
        state.record_visit("Market");
        state.record_visit("market");
        assert_eq!(state.visits("MARKET"), 2);
    }

    #[test]
    fn test_state_snapshot_round_trip() {
        let mut state = PlayerState::new().with_tags(["quest", "q:a"]);
        state.set_variable("npc.name", "Mara");
        state.push_log("Took rope", 100);

        let json = serde_json::to_string(&state).unwrap();
        let restored: PlayerState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.session_id, state.session_id);
        assert_eq!(restored.count("q:a"), 1);
        assert_eq!(restored.variable("npc.name"), Some("Mara"));
        assert_eq!(restored.latest_log(), Some("Took rope"));
    }
}
