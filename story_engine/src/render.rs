//! Template rendering for step text, option labels, log lines and tag names.
//!
//! `{{name}}` and `{{name.field}}` are replaced from the player's variables.
//! Pronoun fields (`they`, `them`, `their`, `theirs`, `themself`) fall back to
//! a form derived from the sibling `gender` field when not stored explicitly.
//! Placeholders that cannot be resolved are left as written.

use regex_lite::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

// `{{ key }}` with surrounding whitespace trimmed from the key
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("PLACEHOLDER_REGEX pattern is invalid")
    })
}

/// Render a template against a variable map.
pub fn render(template: &str, variables: &BTreeMap<String, String>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            let key = caps[1].trim();
            resolve(key, variables).unwrap_or_else(|| {
                tracing::trace!(key, "unresolved template placeholder");
                caps[0].to_string()
            })
        })
        .into_owned()
}

fn resolve(key: &str, variables: &BTreeMap<String, String>) -> Option<String> {
    if let Some(value) = variables.get(key) {
        return Some(value.clone());
    }

    let (entity, field) = key.rsplit_once('.')?;
    let gender = variables.get(&format!("{}.gender", entity)).map(String::as_str);
    pronoun(field, gender)
}

/// Grammatical gender recognised in a `gender` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gender {
    Male,
    Female,
    Neutral,
}

impl Gender {
    fn from_field(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("male" | "m" | "man") => Gender::Male,
            Some("female" | "f" | "woman") => Gender::Female,
            _ => Gender::Neutral,
        }
    }

    /// Subject, object, possessive determiner, possessive pronoun, reflexive.
    fn forms(&self) -> [&'static str; 5] {
        match self {
            Gender::Male => ["he", "him", "his", "his", "himself"],
            Gender::Female => ["she", "her", "her", "hers", "herself"],
            Gender::Neutral => ["they", "them", "their", "theirs", "themselves"],
        }
    }
}

fn pronoun(field: &str, gender: Option<&str>) -> Option<String> {
    let slot = match field.to_ascii_lowercase().as_str() {
        "they" => 0,
        "them" => 1,
        "their" => 2,
        "theirs" => 3,
        "themself" | "themselves" => 4,
        _ => return None,
    };

    let form = Gender::from_field(gender).forms()[slot];
    if field.starts_with(|c: char| c.is_ascii_uppercase()) {
        Some(capitalize(form))
    } else {
        Some(form.to_string())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
