//! System endpoints: health check and the fixed chat parameters.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// One fixed chat endpoint parameter.
#[derive(Debug, Serialize, ToSchema)]
struct ChatParamEntry {
    name: String,
    value: String,
}

/// `GET /config/chat-params` — Parameters appended to every chat endpoint.
#[utoipa::path(
    get,
    path = "/config/chat-params",
    tag = "System",
    summary = "List chat parameters",
    description = "Returns the fixed generation and voice settings sent in the chat endpoint query. They are not configurable.",
    responses(
        (status = 200, description = "Chat parameter list", body = Vec<ChatParamEntry>),
    )
)]
pub async fn chat_params_handler(State(state): State<AppState>) -> impl IntoResponse {
    let entries: Vec<ChatParamEntry> = state
        .params
        .query_pairs()
        .into_iter()
        .map(|(name, value)| ChatParamEntry {
            name: name.to_string(),
            value,
        })
        .collect();
    (StatusCode::OK, Json(entries))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/chat-params", get(chat_params_handler))
}
