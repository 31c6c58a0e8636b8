//! HTTP gateway: POST /generateScenario → one game round → Scenario JSON.
//!
//! Failures answer `{"error": {"message": ..}}`: 400 for unusable request
//! bodies and empty choices, 500 for everything else. Each round is limited
//! by a timeout; an expired round leaves the player's history untouched.

use anyhow::Result;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;

use crate::error::{CompletionError, GameError, SCENARIO_NOT_GENERATED};
use crate::game::{ScenarioExchange, ScenarioRequest};
use crate::session::{CookieUserIdResolver, UserIdResolver};

/// Default timeout for one round (model call included).
pub const TURN_TIMEOUT_SECS: u64 = 120;

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct GatewayState {
    pub exchange: Arc<ScenarioExchange>,
    pub resolver: Arc<dyn UserIdResolver>,
    pub turn_timeout_secs: u64,
    /// When Some, limits concurrent rounds; excess requests wait for a slot.
    pub concurrency_semaphore: Option<Arc<Semaphore>>,
    pub max_concurrent_turns: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// Error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
}

/// Response body for GET /user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub is_logged_in: bool,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct GatewayHealthResponse {
    pub status: &'static str,
    pub completion_backend: &'static str,
    pub max_rounds: usize,
    pub turn_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_turns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_flight_turns: Option<usize>,
    pub active_sessions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_sessions: Option<usize>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error: ErrorMessage {
            message: message.into(),
        },
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        match self {
            GameError::AmbiguousInput { .. } => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            GameError::Parse(_) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, SCENARIO_NOT_GENERATED)
            }
            GameError::Configuration(_) | GameError::Upstream(_) | GameError::Store(_) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        }
    }
}

/// Empty body is the same as `{}`; anything else must be a JSON object.
pub fn parse_scenario_request(body: &[u8]) -> Result<ScenarioRequest, (StatusCode, String)> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ScenarioRequest::default());
    }
    serde_json::from_slice(body).map_err(|error| {
        (
            StatusCode::BAD_REQUEST,
            format!("invalid request body: {error}"),
        )
    })
}

async fn acquire_slot(
    state: &GatewayState,
) -> Result<Option<tokio::sync::OwnedSemaphorePermit>, Response> {
    let Some(ref sem) = state.concurrency_semaphore else {
        return Ok(None);
    };
    sem.clone().acquire_owned().await.map(Some).map_err(|_| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "concurrency limit closed",
        )
    })
}

async fn handle_generate_scenario(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // No id is issued for a service that cannot play a round at all.
    if let Err(error) = state.exchange.ensure_configured() {
        return error.into_response();
    }
    let user = state.resolver.resolve(&headers);
    let mut response = generate_for_user(&state, &user.user_id, &body).await;
    // The id is persisted even when the round fails so a retry keeps it.
    if let Some((name, value)) = state.resolver.persist_header(&user) {
        response.headers_mut().append(name, value);
    }
    response
}

async fn generate_for_user(state: &GatewayState, user_id: &str, body: &[u8]) -> Response {
    let request = match parse_scenario_request(body) {
        Ok(request) => request,
        Err((status, message)) => return error_response(status, message),
    };
    let _permit = match acquire_slot(state).await {
        Ok(permit) => permit,
        Err(response) => return response,
    };
    let timeout_secs = state.turn_timeout_secs;
    match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        state.exchange.handle(user_id, &request),
    )
    .await
    {
        Ok(Ok(scenario)) => (StatusCode::OK, Json(scenario)).into_response(),
        Ok(Err(error)) => error.into_response(),
        Err(_) => {
            tracing::warn!(user_id, timeout_secs, "round timed out; history untouched");
            GameError::Upstream(CompletionError::Timeout(timeout_secs)).into_response()
        }
    }
}

async fn handle_first_scenario(State(state): State<GatewayState>, body: Bytes) -> Response {
    let request = match parse_scenario_request(&body) {
        Ok(request) => request,
        Err((status, message)) => return error_response(status, message),
    };
    let _permit = match acquire_slot(&state).await {
        Ok(permit) => permit,
        Err(response) => return response,
    };
    let timeout_secs = state.turn_timeout_secs;
    match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        state.exchange.opening_scenario(&request),
    )
    .await
    {
        Ok(Ok(scenario)) => (StatusCode::OK, Json(scenario)).into_response(),
        Ok(Err(error)) => error.into_response(),
        Err(_) => GameError::Upstream(CompletionError::Timeout(timeout_secs)).into_response(),
    }
}

async fn handle_user(State(state): State<GatewayState>, headers: HeaderMap) -> Json<UserResponse> {
    let response = match state.resolver.lookup(&headers) {
        Some(id) => UserResponse {
            id,
            is_logged_in: true,
        },
        None => UserResponse {
            id: String::new(),
            is_logged_in: false,
        },
    };
    Json(response)
}

async fn handle_health(State(state): State<GatewayState>) -> Json<GatewayHealthResponse> {
    let in_flight_turns = state.max_concurrent_turns.and_then(|max| {
        state
            .concurrency_semaphore
            .as_ref()
            .map(|sem| max.saturating_sub(sem.available_permits()))
    });
    let stored_sessions = state.exchange.store().session_count().await.ok();
    Json(GatewayHealthResponse {
        status: "healthy",
        completion_backend: state.exchange.completion_name(),
        max_rounds: state.exchange.max_rounds(),
        turn_timeout_secs: state.turn_timeout_secs,
        max_concurrent_turns: state.max_concurrent_turns,
        in_flight_turns,
        active_sessions: state.exchange.gate().active_sessions(),
        stored_sessions,
    })
}

/// Build the gateway router with the default cookie resolver.
pub fn router(
    exchange: ScenarioExchange,
    turn_timeout_secs: u64,
    max_concurrent_turns: Option<usize>,
) -> Router {
    router_with_resolver(
        exchange,
        Arc::new(CookieUserIdResolver::default()),
        turn_timeout_secs,
        max_concurrent_turns,
    )
}

/// Build the gateway router with an injected session resolver.
pub fn router_with_resolver(
    exchange: ScenarioExchange,
    resolver: Arc<dyn UserIdResolver>,
    turn_timeout_secs: u64,
    max_concurrent_turns: Option<usize>,
) -> Router {
    let concurrency_semaphore = max_concurrent_turns.map(|n| Arc::new(Semaphore::new(n)));
    let state = GatewayState {
        exchange: Arc::new(exchange),
        resolver,
        turn_timeout_secs,
        concurrency_semaphore,
        max_concurrent_turns,
    };
    Router::new()
        .route("/health", get(handle_health))
        .route("/user", get(handle_user))
        .route("/api/user", get(handle_user))
        .route("/generateScenario", post(handle_generate_scenario))
        .route("/api/generateScenario", post(handle_generate_scenario))
        .route("/firstScenario", post(handle_first_scenario))
        .route("/api/firstScenario", post(handle_first_scenario))
        .with_state(state)
}

/// Run the HTTP server; binds to `bind_addr` (e.g. `0.0.0.0:8080`).
/// Graceful shutdown on Ctrl+C (SIGINT) and SIGTERM (Unix); in-flight requests complete before exit.
pub async fn run_http(
    exchange: ScenarioExchange,
    resolver: Arc<dyn UserIdResolver>,
    bind_addr: &str,
    turn_timeout_secs: Option<u64>,
    max_concurrent_turns: Option<usize>,
) -> Result<()> {
    let timeout = turn_timeout_secs.unwrap_or(TURN_TIMEOUT_SECS);
    let max_rounds = exchange.max_rounds();
    let backend = exchange.completion_name();
    let app = router_with_resolver(exchange, resolver, timeout, max_concurrent_turns);
    let listener = TcpListener::bind(bind_addr).await?;
    let max_str = max_concurrent_turns
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unlimited".to_string());
    tracing::info!(
        "gateway listening on {} (backend={}, max_rounds={}, turn_timeout={}s, max_concurrent={}, Ctrl+C/SIGTERM to stop)",
        bind_addr,
        backend,
        max_rounds,
        timeout,
        max_str
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let ctrl_c = tokio::signal::ctrl_c();
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "failed to listen for SIGTERM; Ctrl+C only");
                let _ = ctrl_c.await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %error, "failed to listen for Ctrl+C");
        }
    }
}
