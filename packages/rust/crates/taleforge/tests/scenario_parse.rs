#![allow(missing_docs)]

use std::collections::HashSet;

use taleforge::{
    GameError, Scenario, ScenarioOption, Turn, backfill_option_ids, latest_scenario,
    parse_scenario,
};

#[test]
fn parses_plain_reply() {
    let scenario = parse_scenario(
        r#"{"desc": "A cave.", "options": [{"id": "option1", "label": "Enter"}]}"#,
    )
    .expect("scenario");
    assert_eq!(scenario.description, "A cave.");
    assert_eq!(
        scenario.options,
        vec![ScenarioOption {
            id: "option1".to_string(),
            label: "Enter".to_string(),
        }]
    );
    assert!(!scenario.is_terminal());
}

#[test]
fn parses_fenced_reply_and_description_alias() {
    let reply = "```json\n{\"description\": \"The end.\", \"options\": []}\n```";
    let scenario = parse_scenario(reply).expect("scenario");
    assert_eq!(scenario.description, "The end.");
    assert!(scenario.is_terminal());
}

#[test]
fn parses_single_line_fenced_reply() {
    for reply in [
        r#"```{"desc": "Inline.", "options": []}```"#,
        r#"```json {"desc": "Inline.", "options": []}```"#,
        "```json\n{\"desc\": \"Inline.\"}\n```",
    ] {
        let scenario = parse_scenario(reply).expect("scenario");
        assert_eq!(scenario.description, "Inline.", "reply {reply:?}");
    }
}

#[test]
fn missing_options_means_terminal() {
    let scenario = parse_scenario(r#"{"desc": "Fin."}"#).expect("scenario");
    assert!(scenario.is_terminal());
}

#[test]
fn malformed_or_empty_reply_is_parse_error() {
    for reply in ["", "   ", "Once upon a time...", r#"{"options": []}"#, "[1, 2]"] {
        let err = parse_scenario(reply).expect_err("should fail");
        assert!(matches!(err, GameError::Parse(_)), "reply {reply:?}");
        assert_eq!(err.to_string(), "scenario not generated");
    }
}

#[test]
fn serializes_with_desc_key() {
    let scenario = Scenario {
        description: "Hello".to_string(),
        options: vec![],
    };
    let json: serde_json::Value =
        serde_json::from_str(&scenario.to_json().expect("json")).expect("value");
    assert_eq!(json, serde_json::json!({"desc": "Hello", "options": []}));
}

#[test]
fn backfill_replaces_empty_ids_with_distinct_values() {
    let mut scenario = parse_scenario(
        r#"{"desc": "d", "options": [
            {"id": "", "label": "a"},
            {"label": "b"},
            {"id": "  ", "label": "c"}
        ]}"#,
    )
    .expect("scenario");

    let replaced = backfill_option_ids(&mut scenario);

    assert_eq!(replaced, 3);
    let ids: HashSet<&str> = scenario.options.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| !id.trim().is_empty()));
}

#[test]
fn backfill_keeps_real_ids_and_fixes_duplicates() {
    let mut scenario = parse_scenario(
        r#"{"desc": "d", "options": [
            {"id": "opt1", "label": "a"},
            {"id": "opt1", "label": "b"},
            {"id": "opt3", "label": "c"}
        ]}"#,
    )
    .expect("scenario");

    assert_eq!(backfill_option_ids(&mut scenario), 1);
    assert_eq!(scenario.options[0].id, "opt1");
    assert_ne!(scenario.options[1].id, "opt1");
    assert_eq!(scenario.options[2].id, "opt3");
}

#[test]
fn latest_scenario_reads_last_assistant_turn() {
    let history = vec![
        Turn::system("start"),
        Turn::assistant(r#"{"desc": "one", "options": [{"id": "a", "label": "A"}]}"#),
        Turn::system("next"),
        Turn::assistant(r#"{"desc": "two", "options": [{"id": "b", "label": "B"}]}"#),
    ];
    let scenario = latest_scenario(&history).expect("scenario");
    assert_eq!(scenario.description, "two");
    assert_eq!(scenario.option("b").map(|o| o.label.as_str()), Some("B"));
    assert!(scenario.option("a").is_none());
    assert!(latest_scenario(&[Turn::system("only")]).is_none());
}
