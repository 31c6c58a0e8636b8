//! Game namespace: round controller, instruction templates, scenario decoding, exchange.

mod exchange;
mod prompts;
mod round;
mod scenario;

pub use exchange::{ScenarioExchange, ScenarioRequest};
pub use prompts::{
    CONCLUSION_REQUEST, ChoiceDescription, StoryRules, build_first_round, build_last_round,
    build_middle_round, is_english,
};
pub use round::{AmbiguousInput, PlayerInput, RoundContext, RoundKind, decide_round};
pub use scenario::{
    Scenario, ScenarioOption, backfill_option_ids, latest_scenario, parse_scenario,
};
