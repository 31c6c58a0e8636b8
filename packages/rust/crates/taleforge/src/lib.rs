//! Choose-your-own-adventure backend: round state machine + scenario generation over HTTP.
//!
//! - **Session**: per-user transcript store, per-user gate, cookie identity.
//! - **Game**: round controller (first / middle / last), instruction templates,
//!   scenario decoding, and the exchange that ties them to the completion API.
//! - **Gateway**: axum router (POST /generateScenario, POST /firstScenario, GET /user, GET /health).

#![allow(missing_docs)]

mod config;
mod error;
mod game;
mod gateway;
mod llm;
mod observability;
mod session;

use std::sync::Arc;

pub use config::{
    GameConfig, GameSettings, GatewaySettings, MISSING_API_KEY_MESSAGE, OPENAI_DEFAULT_URL,
    RuntimeSettings, load_runtime_settings, load_runtime_settings_from_paths,
    runtime_settings_paths, set_config_home_override,
};
pub use error::{CompletionError, GameError, SCENARIO_NOT_GENERATED};
pub use game::{
    AmbiguousInput, CONCLUSION_REQUEST, ChoiceDescription, PlayerInput, RoundContext, RoundKind,
    Scenario, ScenarioExchange, ScenarioOption, ScenarioRequest, StoryRules, backfill_option_ids,
    build_first_round, build_last_round, build_middle_round, decide_round, is_english,
    latest_scenario, parse_scenario,
};
pub use gateway::{
    ErrorMessage, ErrorResponse, GatewayHealthResponse, GatewayState, TURN_TIMEOUT_SECS,
    UserResponse, parse_scenario_request, router, router_with_resolver, run_http,
};
pub use llm::{CompletionClient, LlmClient, MockCompletionClient};
pub use session::{
    ConversationStore, CookieUserIdResolver, DEFAULT_SESSION_COOKIE_NAME,
    InMemoryConversationStore, ResolvedUser, Role, SessionGate, SessionGuard, Turn,
    UserIdResolver, count_assistant_turns,
};

/// Exchange wired to the in-memory store and the completion backend named by `config`.
pub fn build_exchange(config: GameConfig) -> ScenarioExchange {
    let completion: Arc<dyn CompletionClient> = if config.mock {
        Arc::new(MockCompletionClient::new())
    } else {
        Arc::new(LlmClient::from_config(&config))
    };
    ScenarioExchange::new(
        config,
        Arc::new(InMemoryConversationStore::new()),
        completion,
    )
}
