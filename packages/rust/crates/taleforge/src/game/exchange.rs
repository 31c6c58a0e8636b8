//! Scenario exchange: history → round → instruction → model → scenario → history.

use std::sync::Arc;

use serde::Deserialize;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::llm::CompletionClient;
use crate::observability::GameEvent;
use crate::session::{ConversationStore, SessionGate, Turn};

use super::prompts::{
    ChoiceDescription, StoryRules, build_first_round, build_last_round, build_middle_round,
};
use super::round::{PlayerInput, RoundContext, RoundKind, decide_round};
use super::scenario::{Scenario, backfill_option_ids, latest_scenario, parse_scenario};

/// Request body for POST /generateScenario. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub option_chosen: Option<String>,
    #[serde(default)]
    pub custom_option: Option<String>,
}

impl ScenarioRequest {
    pub fn choose(option_id: impl Into<String>) -> Self {
        Self {
            option_chosen: Some(option_id.into()),
            ..Self::default()
        }
    }

    pub fn custom(text: impl Into<String>) -> Self {
        Self {
            custom_option: Some(text.into()),
            ..Self::default()
        }
    }

    fn player_input(&self) -> PlayerInput {
        PlayerInput::from_fields(self.option_chosen.as_deref(), self.custom_option.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Orchestrates one round per call. History for a user is only written after
/// a successful model reply, so any failure leaves the round retryable.
pub struct ScenarioExchange {
    config: GameConfig,
    store: Arc<dyn ConversationStore>,
    completion: Arc<dyn CompletionClient>,
    gate: SessionGate,
}

impl ScenarioExchange {
    pub fn new(
        config: GameConfig,
        store: Arc<dyn ConversationStore>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            config,
            store,
            completion,
            gate: SessionGate::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn max_rounds(&self) -> usize {
        self.config.effective_max_rounds()
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub fn completion_name(&self) -> &'static str {
        self.completion.name()
    }

    fn rules(&self) -> StoryRules {
        StoryRules {
            max_rounds: self.max_rounds(),
            max_words_per_description: self.config.max_words_per_description,
        }
    }

    fn language<'a>(&'a self, request: &'a ScenarioRequest) -> &'a str {
        non_blank(request.language.as_deref()).unwrap_or(&self.config.default_language)
    }

    fn opening_turn(&self, request: &ScenarioRequest) -> Turn {
        let theme = non_blank(request.theme.as_deref()).unwrap_or(&self.config.default_theme);
        let name =
            non_blank(request.name.as_deref()).unwrap_or(&self.config.default_character_name);
        build_first_round(theme, name, self.language(request), self.rules())
    }

    /// Fails with [`GameError::Configuration`] when the completion backend
    /// cannot be called at all (e.g. no API key for a remote endpoint).
    pub fn ensure_configured(&self) -> Result<(), GameError> {
        self.completion
            .ensure_configured()
            .map_err(GameError::Configuration)
    }

    /// Play one round for `user_id`.
    pub async fn handle(
        &self,
        user_id: &str,
        request: &ScenarioRequest,
    ) -> Result<Scenario, GameError> {
        self.ensure_configured()?;

        let _guard = self.gate.acquire(user_id).await;
        let history = self.store.get(user_id).await.map_err(GameError::Store)?;
        let max_rounds = self.max_rounds();
        let context = RoundContext::from_history(&history, max_rounds);
        let input = request.player_input();
        let kind = decide_round(history.len(), context.round_number, max_rounds, &input)
            .map_err(|ambiguous| {
                tracing::warn!(
                    event = GameEvent::RoundRejected.as_str(),
                    user_id,
                    round_number = ambiguous.round_number,
                    "choice field sent empty; refusing to guess the round"
                );
                GameError::AmbiguousInput {
                    round_number: ambiguous.round_number,
                }
            })?;

        // A first round always starts a new story, even over an unfinished one.
        let restarting = kind == RoundKind::First && !history.is_empty();
        let prior: &[Turn] = if kind == RoundKind::First {
            &[]
        } else {
            &history
        };
        let round_number = if kind == RoundKind::First {
            1
        } else {
            context.round_number
        };
        tracing::info!(
            event = GameEvent::RoundSelected.as_str(),
            user_id,
            round = kind.as_str(),
            round_number,
            max_rounds,
            restarting,
            "round selected"
        );

        let new_turn = match kind {
            RoundKind::First => self.opening_turn(request),
            RoundKind::Middle => build_middle_round(
                &describe_choice(&input, &history),
                round_number,
                max_rounds,
                self.language(request),
            ),
            RoundKind::Last => {
                build_last_round(&describe_choice(&input, &history), self.language(request))
            }
        };

        let mut transcript = prior.to_vec();
        transcript.push(new_turn.clone());
        let scenario = self.generate(user_id, &transcript).await?;
        let reply_turn = Turn::assistant(
            scenario
                .to_json()
                .map_err(|e| GameError::Parse(e.to_string()))?,
        );

        // Each branch is a single store mutation, so a failed or dropped
        // request never leaves a half-written transcript behind.
        let round_turns = vec![new_turn, reply_turn];
        if kind == RoundKind::Last {
            if !scenario.is_terminal() {
                tracing::warn!(
                    user_id,
                    options = scenario.options.len(),
                    "conclusion came back with options; ending the story anyway"
                );
            }
            self.store.clear(user_id).await.map_err(GameError::Store)?;
            tracing::info!(
                event = GameEvent::StoryConcluded.as_str(),
                user_id,
                rounds = round_number,
                "story concluded; history cleared"
            );
        } else if restarting {
            self.store
                .replace(user_id, round_turns)
                .await
                .map_err(GameError::Store)?;
        } else {
            self.store
                .append(user_id, round_turns)
                .await
                .map_err(GameError::Store)?;
        }
        Ok(scenario)
    }

    /// Stateless opening scenario; no history is read or written.
    pub async fn opening_scenario(&self, request: &ScenarioRequest) -> Result<Scenario, GameError> {
        self.ensure_configured()?;
        let turn = self.opening_turn(request);
        self.generate("-", std::slice::from_ref(&turn)).await
    }

    async fn generate(&self, user_id: &str, transcript: &[Turn]) -> Result<Scenario, GameError> {
        tracing::debug!(
            event = GameEvent::CompletionRequested.as_str(),
            user_id,
            backend = self.completion.name(),
            turns = transcript.len(),
            "requesting scenario"
        );
        let reply = self.completion.complete(transcript).await.map_err(|error| {
            tracing::warn!(
                event = GameEvent::CompletionFailed.as_str(),
                user_id,
                error = %error,
                "completion failed; history untouched"
            );
            GameError::Upstream(error)
        })?;
        let mut scenario = parse_scenario(&reply).inspect_err(|error| {
            tracing::warn!(
                event = GameEvent::ScenarioParseFailed.as_str(),
                user_id,
                error = ?error,
                reply_chars = reply.chars().count(),
                "model reply is not a scenario"
            );
        })?;
        let replaced = backfill_option_ids(&mut scenario);
        if replaced > 0 {
            tracing::debug!(
                event = GameEvent::ScenarioIdsBackfilled.as_str(),
                user_id,
                replaced,
                "option ids backfilled"
            );
        }
        tracing::debug!(
            event = GameEvent::ScenarioDelivered.as_str(),
            user_id,
            options = scenario.options.len(),
            "scenario ready"
        );
        Ok(scenario)
    }
}

/// Render the player's input against the scenario they were shown.
fn describe_choice(input: &PlayerInput, history: &[Turn]) -> ChoiceDescription {
    match input {
        PlayerInput::Custom(text) => ChoiceDescription::Custom(text.clone()),
        PlayerInput::Chosen(id) => ChoiceDescription::Option {
            id: id.clone(),
            label: latest_scenario(history)
                .and_then(|scenario| scenario.option(id).map(|option| option.label.clone())),
        },
        // Only reachable for the conclusion, which needs no prior choice.
        PlayerInput::Blank | PlayerInput::Absent => ChoiceDescription::Option {
            id: "nothing".to_string(),
            label: None,
        },
    }
}
