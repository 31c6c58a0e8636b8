//! Runtime settings loader for taleforge.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/packages/conf/settings.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME>/taleforge/settings.yaml`
//!
//! Merge precedence is user over system.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

use super::game::GameConfig;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "packages/conf/settings.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "taleforge/settings.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";
static CONFIG_HOME_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeSettings {
    #[serde(default)]
    pub game: GameSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameSettings {
    pub inference_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_rounds: Option<usize>,
    pub max_words_per_description: Option<usize>,
    pub default_theme: Option<String>,
    pub default_character_name: Option<String>,
    pub default_language: Option<String>,
    pub mock: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewaySettings {
    pub bind: Option<String>,
    pub turn_timeout_secs: Option<u64>,
    pub max_concurrent_turns: Option<usize>,
    pub session_cookie_name: Option<String>,
    pub session_cookie_secure: Option<bool>,
}

impl RuntimeSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            game: self.game.merge(overlay.game),
            gateway: self.gateway.merge(overlay.gateway),
        }
    }
}

impl GameSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            inference_url: overlay.inference_url.or(self.inference_url),
            model: overlay.model.or(self.model),
            temperature: overlay.temperature.or(self.temperature),
            max_rounds: overlay.max_rounds.or(self.max_rounds),
            max_words_per_description: overlay
                .max_words_per_description
                .or(self.max_words_per_description),
            default_theme: overlay.default_theme.or(self.default_theme),
            default_character_name: overlay
                .default_character_name
                .or(self.default_character_name),
            default_language: overlay.default_language.or(self.default_language),
            mock: overlay.mock.or(self.mock),
        }
    }

    /// Overlay the configured values onto `base`; unset fields keep the base value.
    pub fn apply_to(&self, base: GameConfig) -> GameConfig {
        GameConfig {
            inference_url: self.inference_url.clone().unwrap_or(base.inference_url),
            model: self.model.clone().unwrap_or(base.model),
            api_key: base.api_key,
            temperature: self.temperature.unwrap_or(base.temperature),
            max_rounds: self.max_rounds.unwrap_or(base.max_rounds),
            max_words_per_description: self
                .max_words_per_description
                .unwrap_or(base.max_words_per_description),
            default_theme: self.default_theme.clone().unwrap_or(base.default_theme),
            default_character_name: self
                .default_character_name
                .clone()
                .unwrap_or(base.default_character_name),
            default_language: self
                .default_language
                .clone()
                .unwrap_or(base.default_language),
            mock: self.mock.unwrap_or(base.mock),
        }
    }
}

impl GatewaySettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            bind: overlay.bind.or(self.bind),
            turn_timeout_secs: overlay.turn_timeout_secs.or(self.turn_timeout_secs),
            max_concurrent_turns: overlay.max_concurrent_turns.or(self.max_concurrent_turns),
            session_cookie_name: overlay.session_cookie_name.or(self.session_cookie_name),
            session_cookie_secure: overlay
                .session_cookie_secure
                .or(self.session_cookie_secure),
        }
    }
}

/// Load merged runtime settings (user overrides system).
pub fn load_runtime_settings() -> RuntimeSettings {
    let (system_path, user_path) = runtime_settings_paths();
    load_runtime_settings_from_paths(&system_path, &user_path)
}

#[doc(hidden)]
pub fn runtime_settings_paths() -> (PathBuf, PathBuf) {
    let root = project_root();
    let system_path = root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = resolve_config_home(&root).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

#[doc(hidden)]
pub fn load_runtime_settings_from_paths(system: &Path, user: &Path) -> RuntimeSettings {
    load_one(system).merge(load_one(user))
}

fn load_one(path: &Path) -> RuntimeSettings {
    if !path.exists() {
        return RuntimeSettings::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return RuntimeSettings::default();
        }
    };
    match serde_yaml::from_str::<RuntimeSettings>(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            RuntimeSettings::default()
        }
    }
}

fn project_root() -> PathBuf {
    std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Set config-home override (used by CLI `--conf`).
///
/// The path can be absolute, or relative to `PRJ_ROOT`/cwd.
pub fn set_config_home_override(path: impl Into<PathBuf>) {
    let path = path.into();
    if path.as_os_str().is_empty() {
        return;
    }
    if CONFIG_HOME_OVERRIDE.set(path.clone()).is_err() {
        if let Some(current) = CONFIG_HOME_OVERRIDE.get() {
            if current != &path {
                tracing::warn!(
                    current = %current.display(),
                    ignored = %path.display(),
                    "config home override already set; ignoring subsequent value"
                );
            }
        }
    }
}

fn resolve_config_home(project_root: &Path) -> PathBuf {
    if let Some(path) = CONFIG_HOME_OVERRIDE.get() {
        return absolutize(project_root, path.clone());
    }

    let configured = std::env::var("PRJ_CONFIG_HOME")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_HOME_RELATIVE_PATH.to_string());
    absolutize(project_root, PathBuf::from(configured))
}

fn absolutize(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}
