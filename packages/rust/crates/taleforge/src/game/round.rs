//! Round controller: which instruction template the next exchange uses.
//!
//! Nothing is persisted between requests; the round is rebuilt each time
//! from the stored transcript length and the configured budget.

use crate::session::{Turn, count_assistant_turns};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundKind {
    First,
    Middle,
    Last,
}

impl RoundKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Middle => "middle",
            Self::Last => "last",
        }
    }
}

/// Choice fields as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    /// Neither `optionChosen` nor `customOption` was sent.
    Absent,
    Chosen(String),
    Custom(String),
    /// A choice field was sent with an empty value.
    Blank,
}

impl PlayerInput {
    /// A selected option wins over custom text when both are sent.
    pub fn from_fields(option_chosen: Option<&str>, custom_option: Option<&str>) -> Self {
        let chosen = option_chosen.map(str::trim);
        let custom = custom_option.map(str::trim);
        match (chosen, custom) {
            (Some(id), _) if !id.is_empty() => Self::Chosen(id.to_string()),
            (_, Some(text)) if !text.is_empty() => Self::Custom(text.to_string()),
            (None, None) => Self::Absent,
            _ => Self::Blank,
        }
    }
}

/// Derived per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundContext {
    pub round_number: usize,
    pub max_rounds: usize,
    pub is_first: bool,
    pub is_last: bool,
}

impl RoundContext {
    pub fn from_history(history: &[Turn], max_rounds: usize) -> Self {
        let round_number = count_assistant_turns(history) + 1;
        Self {
            round_number,
            max_rounds,
            is_first: history.is_empty(),
            is_last: round_number >= max_rounds,
        }
    }
}

/// Outcome of [`decide_round`] when no template applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbiguousInput {
    pub round_number: usize,
}

/// Pure decision over transcript length, round budget and player input.
///
/// A reached budget concludes the story whatever the input. Before that,
/// `Absent` input restarts the story, and `Blank` input is rejected rather
/// than silently concluding it.
pub fn decide_round(
    history_len: usize,
    round_number: usize,
    max_rounds: usize,
    input: &PlayerInput,
) -> Result<RoundKind, AmbiguousInput> {
    if history_len == 0 {
        return Ok(RoundKind::First);
    }
    if round_number >= max_rounds {
        return Ok(RoundKind::Last);
    }
    match input {
        PlayerInput::Absent => Ok(RoundKind::First),
        PlayerInput::Chosen(_) | PlayerInput::Custom(_) => Ok(RoundKind::Middle),
        PlayerInput::Blank => Err(AmbiguousInput { round_number }),
    }
}
