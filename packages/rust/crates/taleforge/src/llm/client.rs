//! OpenAI-compatible chat completions over HTTP.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, MISSING_API_KEY_MESSAGE, is_local_endpoint_url};
use crate::error::CompletionError;
use crate::session::Turn;

use super::CompletionClient;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    temperature: f32,
}

/// Response: choices[0].message.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for chat completions.
pub struct LlmClient {
    client: reqwest::Client,
    inference_url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
    requires_api_key: bool,
}

impl LlmClient {
    pub fn new(
        inference_url: String,
        model: String,
        temperature: f32,
        api_key: Option<String>,
    ) -> Self {
        let requires_api_key = !is_local_endpoint_url(&inference_url);
        Self {
            client: reqwest::Client::new(),
            inference_url,
            model,
            temperature,
            api_key,
            requires_api_key,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            requires_api_key: !config.is_local_endpoint(),
            ..Self::new(
                config.inference_url.clone(),
                config.model.clone(),
                config.temperature,
                config.resolve_api_key(),
            )
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    fn ensure_configured(&self) -> Result<(), String> {
        if self.requires_api_key && self.api_key.is_none() {
            return Err(MISSING_API_KEY_MESSAGE.to_string());
        }
        Ok(())
    }

    async fn complete(&self, turns: &[Turn]) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: turns,
            temperature: self.temperature,
        };
        let mut req = self
            .client
            .post(&self.inference_url)
            .json(&body)
            .header("Content-Type", "application/json");
        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }
        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| CompletionError::Decode(format!("{}; body: {}", e, text)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::EmptyReply)
    }
}
