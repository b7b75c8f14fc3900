//! Settings handlers: read and update the saved address and embed toggle.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{SettingsResponse, UpdateSettingsRequest};
use crate::app_state::AppState;
use crate::domain::{HubEvent, ServerAddress};
use crate::error::{ErrorResponse, HubError};

/// `GET /settings` — Current address, derived endpoints, embed state.
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    tag = "Settings",
    summary = "Get settings",
    description = "Returns the saved server address, its normalized form, the derived chat and socket endpoints, and the embed toggle.",
    responses(
        (status = 200, description = "Current settings", body = SettingsResponse),
    )
)]
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    let address = state.settings.address().await;
    let response =
        SettingsResponse::build(&address, &state.params, state.settings.embed_enabled());
    (StatusCode::OK, Json(response))
}

/// `PUT /settings` — Save a new address and/or flip the embed toggle.
///
/// The address is stored exactly as given; an unusable address only shows
/// up later as a failed probe.
///
/// # Errors
///
/// Returns [`HubError::InvalidRequest`] for an empty update and
/// [`HubError::SettingsError`] if the settings file cannot be written.
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    tag = "Settings",
    summary = "Update settings",
    description = "Saves the server address (no validation) and/or sets the embed toggle. Fields left out are unchanged.",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Updated settings", body = SettingsResponse),
        (status = 400, description = "Empty update", body = ErrorResponse),
        (status = 500, description = "Settings file not writable", body = ErrorResponse),
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, HubError> {
    if req.server_url.is_none() && req.embed_enabled.is_none() {
        return Err(HubError::InvalidRequest(
            "expected server_url or embed_enabled".to_string(),
        ));
    }

    if let Some(enabled) = req.embed_enabled {
        state.settings.set_embed_enabled(enabled);
    }

    if let Some(raw) = req.server_url {
        let address = ServerAddress::new(raw);
        let normalized_url = address.normalized();
        let server_url = address.raw().to_string();
        let saved = state.settings.set_address(address).await;
        let _ = state.event_bus.publish(HubEvent::AddressChanged {
            server_url,
            normalized_url,
            timestamp: Utc::now(),
        });
        saved?;
    }

    let address = state.settings.address().await;
    let response =
        SettingsResponse::build(&address, &state.params, state.settings.embed_enabled());
    Ok((StatusCode::OK, Json(response)))
}

/// Settings routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}
