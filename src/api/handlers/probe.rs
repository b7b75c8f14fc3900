//! Probe handlers: start a probe, read the latest state, celebrate.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{CelebrateResponse, ProbeQuery, ProbeResponse, StartProbeRequest};
use crate::app_state::AppState;
use crate::domain::{CelebrationReason, ServerAddress};
use crate::error::{ErrorResponse, HubError};

/// `POST /probe` — Probe the saved (or given) address.
///
/// Returns `202 Accepted` while the attempt is in flight and `200 OK` once
/// it has settled, which is immediate for an unusable address.
///
/// # Errors
///
/// Returns [`HubError::Internal`] if waiting on the probe state fails.
#[utoipa::path(
    post,
    path = "/api/v1/probe",
    tag = "Probe",
    summary = "Start a connection probe",
    description = "Opens a WebSocket to the derived chat endpoint and waits up to the probe timeout for the readiness frame. A new probe cancels the one in flight. With `wait=true` the response is the settled state.",
    params(ProbeQuery),
    request_body(content = StartProbeRequest, description = "Optional address override (not saved)"),
    responses(
        (status = 200, description = "Probe settled", body = ProbeResponse),
        (status = 202, description = "Probe in flight", body = ProbeResponse),
        (status = 500, description = "Probe state unavailable", body = ErrorResponse),
    )
)]
pub async fn start_probe(
    State(state): State<AppState>,
    Query(query): Query<ProbeQuery>,
    body: Option<Json<StartProbeRequest>>,
) -> Result<impl IntoResponse, HubError> {
    let override_url = body.and_then(|Json(req)| req.server_url);
    let address = match override_url {
        Some(raw) => ServerAddress::new(raw),
        None => state.settings.address().await,
    };

    let snapshot = if query.wait {
        state.probe_service.probe_and_wait(&address).await?
    } else {
        state.probe_service.start_probe(&address).await
    };

    let status = if snapshot.status.is_terminal() {
        StatusCode::OK
    } else {
        StatusCode::ACCEPTED
    };
    Ok((status, Json(ProbeResponse::from(&snapshot))))
}

/// `GET /probe` — Latest probe state.
#[utoipa::path(
    get,
    path = "/api/v1/probe",
    tag = "Probe",
    summary = "Get probe state",
    description = "Returns the state of the most recent probe attempt, or `idle` if none has run.",
    responses(
        (status = 200, description = "Latest probe state", body = ProbeResponse),
    )
)]
pub async fn get_probe(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.probe_service.current();
    (StatusCode::OK, Json(ProbeResponse::from(&snapshot)))
}

/// `POST /celebrate` — Open a celebration window by hand.
#[utoipa::path(
    post,
    path = "/api/v1/celebrate",
    tag = "Probe",
    summary = "Celebrate",
    description = "Publishes `celebration_started` and, after the configured window, `celebration_ended`.",
    responses(
        (status = 202, description = "Celebration window opened", body = CelebrateResponse),
    )
)]
pub async fn celebrate(State(state): State<AppState>) -> impl IntoResponse {
    state.celebration.trigger(CelebrationReason::Manual);
    let response = CelebrateResponse {
        active: state.celebration.is_active(),
        duration_ms: state.celebration.duration().as_millis() as u64,
    };
    (StatusCode::ACCEPTED, Json(response))
}

/// Probe routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/probe", post(start_probe).get(get_probe))
        .route("/celebrate", post(celebrate))
}
