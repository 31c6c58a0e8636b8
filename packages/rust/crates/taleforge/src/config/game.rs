//! Game configuration: inference endpoint, model, credential, round budget, story defaults.

use serde::{Deserialize, Serialize};

/// OpenAI chat completions endpoint.
pub const OPENAI_DEFAULT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Shown when no credential is configured for a remote endpoint.
pub const MISSING_API_KEY_MESSAGE: &str =
    "OpenAI API key not configured, please follow instructions in README.md";

/// True for loopback endpoints, which are called without a credential.
pub(crate) fn is_local_endpoint_url(url: &str) -> bool {
    url.contains("127.0.0.1") || url.contains("localhost")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Chat completions endpoint (OpenAI or any compatible proxy).
    #[serde(default = "default_inference_url")]
    pub inference_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// API key; if None, read from env OPENAI_API_KEY (not needed for localhost endpoints).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Rounds per story, the last one being the conclusion.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    /// Word limit the model is asked to respect for each description.
    #[serde(default = "default_max_words_per_description")]
    pub max_words_per_description: usize,
    #[serde(default = "default_theme")]
    pub default_theme: String,
    #[serde(default = "default_character_name")]
    pub default_character_name: String,
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Serve canned scenarios instead of calling the model.
    #[serde(default)]
    pub mock: bool,
}

fn default_inference_url() -> String {
    OPENAI_DEFAULT_URL.to_string()
}
fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_temperature() -> f32 {
    0.9
}
fn default_max_rounds() -> usize {
    10
}
fn default_max_words_per_description() -> usize {
    100
}
fn default_theme() -> String {
    "Fantasy".to_string()
}
fn default_character_name() -> String {
    "Liam".to_string()
}
fn default_language() -> String {
    "English".to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            inference_url: default_inference_url(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            max_rounds: default_max_rounds(),
            max_words_per_description: default_max_words_per_description(),
            default_theme: default_theme(),
            default_character_name: default_character_name(),
            default_language: default_language(),
            mock: false,
        }
    }
}

impl GameConfig {
    /// Resolve API key: config field, then none for local endpoints, then OPENAI_API_KEY.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref k) = self.api_key {
            return Some(k.clone()).filter(|k| !k.trim().is_empty());
        }
        if self.is_local_endpoint() {
            return None;
        }
        std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Local proxies (LiteLLM, LM Studio, llama.cpp) accept unauthenticated calls.
    pub fn is_local_endpoint(&self) -> bool {
        is_local_endpoint_url(&self.inference_url)
    }

    /// Round budget, never below one.
    pub fn effective_max_rounds(&self) -> usize {
        self.max_rounds.max(1)
    }
}
