//! Scenario wire type and model reply decoding.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::session::Turn;

/// One step of the story. No options means the story is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(rename = "desc", alias = "description")]
    pub description: String,
    #[serde(default)]
    pub options: Vec<ScenarioOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOption {
    #[serde(default)]
    pub id: String,
    pub label: String,
}

impl Scenario {
    pub fn is_terminal(&self) -> bool {
        self.options.is_empty()
    }

    pub fn option(&self, id: &str) -> Option<&ScenarioOption> {
        self.options.iter().find(|option| option.id == id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decode a model reply. Only the JSON structure is checked; a Markdown code
/// fence around the object is tolerated.
pub fn parse_scenario(reply: &str) -> Result<Scenario, GameError> {
    let body = strip_code_fence(reply.trim());
    if body.is_empty() {
        return Err(GameError::Parse("empty reply".to_string()));
    }
    serde_json::from_str::<Scenario>(body).map_err(|e| GameError::Parse(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`); the body may follow on the same line.
    let rest =
        rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Give every option a distinct non-empty id. Empty ids and repeats of an
/// earlier id are replaced with fresh UUIDs. Returns how many were replaced.
pub fn backfill_option_ids(scenario: &mut Scenario) -> usize {
    let mut seen = HashSet::new();
    let mut replaced = 0;
    for option in &mut scenario.options {
        let id = option.id.trim();
        if id.is_empty() || !seen.insert(id.to_string()) {
            option.id = uuid::Uuid::new_v4().to_string();
            seen.insert(option.id.clone());
            replaced += 1;
        }
    }
    replaced
}

/// Most recent scenario the model produced in this transcript.
pub fn latest_scenario(history: &[Turn]) -> Option<Scenario> {
    history
        .iter()
        .rev()
        .find(|turn| turn.is_assistant())
        .and_then(|turn| parse_scenario(&turn.content).ok())
}
