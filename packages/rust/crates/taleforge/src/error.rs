//! Error types for scenario generation.

use thiserror::Error;

/// Message returned when the model reply cannot be turned into a scenario.
pub const SCENARIO_NOT_GENERATED: &str = "scenario not generated";

/// Failure modes of one scenario exchange. None of them mutate stored history.
#[derive(Error, Debug)]
pub enum GameError {
    /// Required credential absent; raised before any work begins.
    #[error("{0}")]
    Configuration(String),

    /// Completion collaborator failed (network, rate limit, auth, timeout).
    #[error("{0}")]
    Upstream(#[from] CompletionError),

    /// Model reply is not a structured scenario.
    #[error("scenario not generated")]
    Parse(String),

    /// A choice field was sent but empty in a round that needs one.
    #[error("round {round_number} needs optionChosen or customOption to be non-empty")]
    AmbiguousInput { round_number: usize },

    /// Conversation store backend failed.
    #[error("conversation store error: {0}")]
    Store(#[source] anyhow::Error),
}

/// Failure reported by a completion collaborator.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(String),

    /// Non-success status; `message` is the upstream `error.message` when present.
    #[error("completion API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("completion response has no content")]
    EmptyReply,

    #[error("completion response parse error: {0}")]
    Decode(String),

    #[error("completion timed out after {0}s")]
    Timeout(u64),
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        CompletionError::Transport(err.to_string())
    }
}
