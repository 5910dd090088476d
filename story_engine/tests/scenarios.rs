//! End-to-end play scenarios over JSON content.

use std::collections::HashSet;

use story_engine::{ContentLibrary, EngineConfig, OptionState, Session, Visit};
use story_rules::{CharacterSheet, PlayerState};

const CONTENT: &str = r#"{
    "steps": [
        {
            "id": "Market",
            "tags": ["+inv:rope"],
            "text": "A merchant hands you a coil of rope.",
            "log": "Took rope",
            "options": ["Walk to the shrine::shrine", "Leave"]
        },
        {
            "id": "shrine",
            "tags": ["quest", "-quest"],
            "text": "The pilgrimage is over.",
            "log": "Finished the pilgrimage"
        },
        {
            "id": "shrine",
            "tags": ["!quest"],
            "text": "The shrine is quiet."
        },
        {
            "id": "square",
            "text": "X"
        },
        {
            "id": "tavern",
            "vars": {"host": [{"name": "Odo", "gender": "male"}]},
            "text": "{{host.name}} polishes a mug.",
            "options": [
                {"label": "Ask {{host.them}} about rumours", "tags": ["_asked", "+_asked"], "pass": "rumours"},
                {"label": "Arm-wrestle {{host.name}}", "skill": ["might", "trait:strong"], "dc": 9, "pass": "win", "fail": "lose"},
                {"label": "Show the guild seal", "tags": ["inv:seal"], "hidden": true, "pass": "rumours"}
            ]
        },
        {"id": "rumours", "text": "{{host.They}} leaned in close."},
        {"id": "win", "tags": ["+trait:strong"], "text": "You win."},
        {"id": "lose", "tags": ["+wound"], "text": "You lose."},
        {"id": "crossroads", "text": "Left."},
        {"id": "crossroads", "text": "Right."}
    ],
    "patches": [
        {"target": "square", "text": {"append": " Y"}},
        {"target": "square", "tags": ["storm"], "text": {"replace": "Z"}},
        {"target": "square", "text": {"append": " W"}},
        {"target": "market", "tags": ["^inv:rope", "+_market-seen"], "text": {"prepend": "Busy day. "}}
    ]
}"#;

fn library() -> ContentLibrary {
    ContentLibrary::from_json_str(CONTENT, &EngineConfig::default()).unwrap()
}

#[test]
fn test_market_grants_rope_and_logs() {
    let library = library();
    let mut session = Session::seeded(&library, EngineConfig::default(), 1);
    let mut state = PlayerState::new();

    let visit = session.visit("market", &mut state);
    let scene = visit.scene().unwrap();

    assert_eq!(state.count("inv:rope"), 1);
    assert_eq!(state.latest_log(), Some("Took rope"));
    assert_eq!(scene.text, "Busy day. A merchant hands you a coil of rope.");
    assert_eq!(state.count("_market-seen"), 1);
}

#[test]
fn test_finishing_the_quest_clears_its_scope() {
    let library = library();
    let mut session = Session::seeded(&library, EngineConfig::default(), 1);
    let mut state = PlayerState::new().with_tags(["quest", "q:a", "q:b", "trait:x"]);

    let visit = session.visit("shrine", &mut state);

    assert_eq!(visit.scene().unwrap().text, "The pilgrimage is over.");
    assert_eq!(state.tags(), ["trait:x".to_string()]);

    let visit = session.visit("shrine", &mut state);
    assert_eq!(visit.scene().unwrap().text, "The shrine is quiet.");
}

#[test]
fn test_patch_text_precedence() {
    let library = library();
    let mut session = Session::seeded(&library, EngineConfig::default(), 1);

    let mut stormy = PlayerState::new().with_tags(["storm"]);
    let visit = session.visit("square", &mut stormy);
    assert_eq!(visit.scene().unwrap().text, "Z");

    let mut calm = PlayerState::new();
    let visit = session.visit("square", &mut calm);
    assert_eq!(visit.scene().unwrap().text, "X Y W");
}

#[test]
fn test_options_render_and_gate() {
    let library = library();
    let mut session = Session::seeded(&library, EngineConfig::default(), 1);
    let mut state = PlayerState::new();

    let visit = session.visit("tavern", &mut state);
    let scene = visit.scene().unwrap();

    assert_eq!(scene.text, "Odo polishes a mug.");
    assert_eq!(scene.options[0].label, "Ask him about rumours");
    assert_eq!(scene.options[0].state, OptionState::Available);
    assert_eq!(scene.options[2].state, OptionState::Hidden);
    assert_eq!(scene.visible_options().count(), 2);

    let choice = session.choose(scene, 0, &mut state).unwrap();
    assert_eq!(state.count("_asked"), 1);
    assert_eq!(choice.visit.scene().unwrap().text, "He leaned in close.");
}

#[test]
fn test_skill_check_sums_attribute_and_tag_sources() {
    let library = library();
    let mut state = PlayerState::new()
        .with_tags(["trait:strong"])
        .with_character(CharacterSheet::new().with_attribute("might", 3));

    let mut session = Session::seeded(&library, EngineConfig::default(), 5);
    let visit = session.visit("tavern", &mut state);
    let choice = session.choose(visit.scene().unwrap(), 1, &mut state).unwrap();
    let check = choice.check.unwrap();

    assert_eq!(check.total_bonus(), 5);
    assert_eq!(check.total, check.roll as i32 + 5);
    assert_eq!(check.success, check.total >= 9);

    let expected = if check.success { "You win." } else { "You lose." };
    assert_eq!(choice.visit.scene().unwrap().text, expected);
}

#[test]
fn test_equal_scores_pick_either_step() {
    let library = library();
    let mut seen = HashSet::new();

    for seed in 0..64 {
        let mut session = Session::seeded(&library, EngineConfig::default(), seed);
        let mut state = PlayerState::new();
        if let Visit::Scene(scene) = session.visit("crossroads", &mut state) {
            seen.insert(scene.text);
        }
    }

    let expected: HashSet<String> = ["Left.".to_string(), "Right.".to_string()].into();
    assert_eq!(seen, expected);
}

#[test]
fn test_same_seed_replays_identically() {
    let library = library();
    let run = |seed| {
        let mut session = Session::seeded(&library, EngineConfig::default(), seed);
        let mut state = PlayerState::new();
        (0..8)
            .filter_map(|_| session.visit("crossroads", &mut state).scene().map(|s| s.text.clone()))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(11), run(11));
}
