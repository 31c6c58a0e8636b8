//! Canned replies for running the game without a model.

use async_trait::async_trait;

use crate::error::CompletionError;
use crate::game::CONCLUSION_REQUEST;
use crate::session::{Role, Turn, count_assistant_turns};

use super::CompletionClient;

const OPENING_SCENARIO: &str = r#"{
  "desc": "You are Liam, a young adventurer living in the kingdom of Eldoria. One day, while exploring the ancient forests, you stumble upon a hidden cave entrance. Curiosity takes hold of you, and you decide to venture inside. As you step into the darkness, you hear a faint whisper coming from the depths of the cave.",
  "options": [
    {"id": "option1", "label": "Follow the whisper"},
    {"id": "option2", "label": "Light a torch and proceed cautiously"},
    {"id": "option3", "label": "Leave the cave and continue exploring the forest"}
  ]
}"#;

const CLOSING_DESCRIPTION: &str = "The whisper fades as dawn breaks over Eldoria. You walk out of the forest carrying the cave's secret, and the kingdom will tell your story for years to come.";

/// Opening scenario on a fresh transcript, follow-ups afterwards, and a
/// conclusion once the last instruction asks for one.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionClient;

impl MockCompletionClient {
    pub fn new() -> Self {
        Self
    }
}

fn follow_up(choice_line: &str) -> String {
    serde_json::json!({
        "desc": format!("This is a followup from your last choice. {choice_line}"),
        "options": [
            {"id": "option1", "label": "Follow the whisper"},
            {"id": "option2", "label": "Light a torch and proceed cautiously"},
            {"id": "option3", "label": "Leave the cave and continue exploring the forest"}
        ]
    })
    .to_string()
}

fn conclusion() -> String {
    serde_json::json!({ "desc": CLOSING_DESCRIPTION, "options": [] }).to_string()
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, turns: &[Turn]) -> Result<String, CompletionError> {
        let instruction = turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::System)
            .map(|turn| turn.content.as_str())
            .unwrap_or_default();
        if instruction.contains(CONCLUSION_REQUEST) {
            return Ok(conclusion());
        }
        if count_assistant_turns(turns) == 0 {
            return Ok(OPENING_SCENARIO.to_string());
        }
        let choice_line = instruction.lines().next().unwrap_or_default().trim();
        Ok(follow_up(choice_line))
    }
}
