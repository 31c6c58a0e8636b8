use std::sync::Arc;

use taleforge::{
    CookieUserIdResolver, DEFAULT_SESSION_COOKIE_NAME, GameConfig, RuntimeSettings,
    UserIdResolver, build_exchange, run_http,
};

const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// CLI flags for gateway mode; `None` falls back to env, then settings, then defaults.
pub(crate) struct GatewayModeRequest {
    pub(crate) bind: Option<String>,
    pub(crate) turn_timeout: Option<u64>,
    pub(crate) max_concurrent: Option<usize>,
    pub(crate) max_rounds: Option<usize>,
    pub(crate) model: Option<String>,
    pub(crate) inference_url: Option<String>,
    pub(crate) mock: bool,
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn resolve_game_config(request: &GatewayModeRequest, settings: &RuntimeSettings) -> GameConfig {
    let mut config = settings.game.apply_to(GameConfig::default());
    if let Some(url) = env_override("TALEFORGE_INFERENCE_URL") {
        config.inference_url = url;
    }
    if let Some(model) = env_override("TALEFORGE_MODEL") {
        config.model = model;
    }
    if let Some(ref url) = request.inference_url {
        config.inference_url = url.clone();
    }
    if let Some(ref model) = request.model {
        config.model = model.clone();
    }
    if let Some(max_rounds) = request.max_rounds {
        config.max_rounds = max_rounds;
    }
    if request.mock {
        config.mock = true;
    }
    config
}

pub(crate) async fn run_gateway_mode(
    request: GatewayModeRequest,
    settings: &RuntimeSettings,
) -> anyhow::Result<()> {
    let config = resolve_game_config(&request, settings);
    if !config.mock && config.resolve_api_key().is_none() && !config.is_local_endpoint() {
        // Not fatal: every round answers 500 with the configuration message until a key is set.
        tracing::warn!(
            inference_url = %config.inference_url,
            "no API key configured (OPENAI_API_KEY); scenario requests will fail"
        );
    }
    let bind = request
        .bind
        .or_else(|| settings.gateway.bind.clone())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let turn_timeout = request.turn_timeout.or(settings.gateway.turn_timeout_secs);
    let max_concurrent = request
        .max_concurrent
        .or(settings.gateway.max_concurrent_turns);
    let resolver: Arc<dyn UserIdResolver> = Arc::new(CookieUserIdResolver::new(
        settings
            .gateway
            .session_cookie_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.to_string()),
        settings.gateway.session_cookie_secure.unwrap_or(false),
    ));
    tracing::info!(
        model = %config.model,
        mock = config.mock,
        max_rounds = config.effective_max_rounds(),
        "starting taleforge gateway"
    );
    run_http(
        build_exchange(config),
        resolver,
        &bind,
        turn_timeout,
        max_concurrent,
    )
    .await
}
