//! Instruction templates sent as system turns, one per round kind.

use crate::session::Turn;

/// Phrase that opens every conclusion request.
pub const CONCLUSION_REQUEST: &str = "Give me a conclusion for this story.";

/// JSON shape every reply must follow.
const RESPONSE_SHAPE: &str = r#"{
    "desc": "<DESCRIPTION OF THE SCENARIO>",
    "options": [{"id": "opt1", "label": "<option 1>"}, ...]
  }"#;

/// Story-wide limits quoted in the opening instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryRules {
    pub max_rounds: usize,
    pub max_words_per_description: usize,
}

/// What the player did last round, as the model should read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceDescription {
    /// An offered option; `label` is known when the id matched the previous scenario.
    Option { id: String, label: Option<String> },
    /// Free text typed by the player.
    Custom(String),
}

impl ChoiceDescription {
    fn sentence(&self) -> String {
        match self {
            Self::Option {
                id,
                label: Some(label),
            } => format!("The user chose {id} (\"{label}\")."),
            Self::Option { id, label: None } => format!("The user chose {id}."),
            Self::Custom(text) => format!(
                "The user did not pick one of the options and wrote instead: \"{text}\". \
                If that makes no sense for the story, pick one of the options you gave last \
                time at random and continue with it."
            ),
        }
    }
}

pub fn is_english(language: &str) -> bool {
    language.trim().eq_ignore_ascii_case("english")
}

fn language_directive(language: &str) -> Option<String> {
    let language = language.trim();
    if language.is_empty() || is_english(language) {
        return None;
    }
    Some(format!("Please generate every response in {language}."))
}

fn with_language(mut content: String, language: &str) -> String {
    if let Some(directive) = language_directive(language) {
        content.push('\n');
        content.push_str(&directive);
    }
    content
}

pub fn build_first_round(theme: &str, name: &str, language: &str, rules: StoryRules) -> Turn {
    let content = format!(
        "I'm having someone play a choose your own adventure game.
  You will be the one providing me with the scenarios.
  The desc of the scenario should not have more than {words} words
  and you shall also give 3 options. Your response has to be in this JSON format:
  {RESPONSE_SHAPE}

  Now give me the beginning of a short story with 3 options (in the above format), with the theme of {theme} where the main character's name is {name}.
  The whole story will end in {rounds} rounds, so create an exciting short story.",
        words = rules.max_words_per_description,
        rounds = rules.max_rounds,
    );
    Turn::system(with_language(content, language))
}

pub fn build_middle_round(
    choice: &ChoiceDescription,
    round_number: usize,
    max_rounds: usize,
    language: &str,
) -> Turn {
    let content = format!(
        "{choice}
  Give me the next round (which is the number {round_number} out of {max_rounds}).
  Keep the story open so the user has real options, and give 3 of them.
  Follow same response structure as last time.",
        choice = choice.sentence(),
    );
    Turn::system(with_language(content, language))
}

pub fn build_last_round(choice: &ChoiceDescription, language: &str) -> Turn {
    let content = format!(
        "{choice}
  {CONCLUSION_REQUEST} Follow same response structure
  as last time but the \"options\" part of the response should be just an empty array.",
        choice = choice.sentence(),
    );
    Turn::system(with_language(content, language))
}
