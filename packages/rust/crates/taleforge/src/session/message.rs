//! Conversation turns (OpenAI-compatible chat messages).

use serde::{Deserialize, Serialize};

/// Author of a turn. Only the server-authored instruction and the model reply are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
}

/// One message in the transcript sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// Number of completed rounds recorded in a transcript.
pub fn count_assistant_turns(turns: &[Turn]) -> usize {
    turns.iter().filter(|turn| turn.is_assistant()).count()
}
