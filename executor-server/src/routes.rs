//! HTTP route handlers.

use std::collections::BTreeMap;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use executor::core::action::ActionKind;
use executor::core::request::{RequestError, parse_request};
use executor::core::types::ActionResponse;
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::state::AppState;

/// Endpoint paths mapped to their one-line descriptions.
pub const ENDPOINTS: [(&str, &str); 3] = [
    ("/", "GET - service information"),
    ("/health", "GET - health check"),
    ("/execute-action", "POST - execute an action"),
];

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/execute-action", post(execute_action))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct ActionInfo {
    description: &'static str,
    payload: BTreeMap<&'static str, &'static str>,
}

#[derive(Serialize)]
struct InfoResponse {
    message: &'static str,
    version: &'static str,
    endpoints: BTreeMap<&'static str, &'static str>,
    actions: BTreeMap<&'static str, ActionInfo>,
}

/// GET / - static description of endpoints and action payloads.
async fn root() -> Json<InfoResponse> {
    let actions = ActionKind::ALL
        .into_iter()
        .map(|kind| {
            let info = ActionInfo {
                description: kind.description(),
                payload: kind.payload_schema().iter().copied().collect(),
            };
            (kind.as_str(), info)
        })
        .collect();

    Json(InfoResponse {
        message: "Action Executor - generic action dispatch service",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS.into_iter().collect(),
        actions,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    agent: String,
    project_path: String,
    available_actions: Vec<String>,
}

/// GET /health - liveness plus the fixed action list. Runs no subprocesses.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        agent: executor::agent_label(),
        project_path: state.project_path(),
        available_actions: ActionKind::names(),
    })
}

/// POST /execute-action - decode, dispatch on the blocking pool, respond.
///
/// The body is taken as raw bytes so that decoding failures map to 400 no
/// matter which `Content-Type` the client sent.
async fn execute_action(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ActionResponse>, ApiError> {
    let request = parse_request(&body).map_err(|err| {
        warn!(err = %err, "rejected execute-action request");
        ApiError::BadRequest(err)
    })?;

    let dispatcher = state.dispatcher.clone();
    let response = tokio::task::spawn_blocking(move || dispatcher.execute(&request))
        .await
        .map_err(|err| {
            error!(err = %err, "action dispatch failed");
            ApiError::Internal(err.to_string())
        })?;

    Ok(Json(response))
}

/// Transport- and server-level failures of the execute-action endpoint.
///
/// Domain-level errors (unknown action, missing branch name) are not here:
/// they travel as a 200 with `status: "error"` in the body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(RequestError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(RequestError::MissingAction) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "status": "error",
                    "message": RequestError::MissingAction.to_string(),
                    "expected_format": {"action": "action_name", "payload": {}},
                })),
            )
                .into_response(),
            ApiError::BadRequest(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "error", "message": err.to_string()})),
            )
                .into_response(),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": format!("internal error: {msg}")})),
            )
                .into_response(),
        }
    }
}
