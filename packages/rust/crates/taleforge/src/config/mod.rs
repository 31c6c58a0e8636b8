//! Config namespace: game config and runtime settings loading.

mod game;
mod settings;

pub(crate) use game::is_local_endpoint_url;
pub use game::{GameConfig, MISSING_API_KEY_MESSAGE, OPENAI_DEFAULT_URL};
pub use settings::{
    GameSettings, GatewaySettings, RuntimeSettings, load_runtime_settings,
    load_runtime_settings_from_paths, runtime_settings_paths, set_config_home_override,
};
