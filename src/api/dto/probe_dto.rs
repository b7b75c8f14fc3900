//! Probe DTOs: start request, wait flag, snapshot response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ProbeSnapshot, ProbeStatus};

/// Optional request body for `POST /api/v1/probe`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StartProbeRequest {
    /// Address to probe instead of the saved one. Not persisted.
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Query parameters for `POST /api/v1/probe`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProbeQuery {
    /// Block until the attempt settles (or is superseded).
    #[serde(default)]
    pub wait: bool,
}

/// Probe state as returned by the probe endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProbeResponse {
    /// Attempt that produced this state; `null` while idle.
    pub attempt_id: Option<uuid::Uuid>,
    /// Visible status.
    pub status: ProbeStatus,
    /// Human-readable note.
    pub note: String,
    /// Outcome kind for settled attempts.
    pub outcome: Option<String>,
    /// Socket URL the attempt used.
    pub socket_url: Option<String>,
    /// Attempt start time.
    pub started_at: Option<DateTime<Utc>>,
    /// Time of the last state change.
    pub updated_at: DateTime<Utc>,
    /// Milliseconds from start to settlement.
    pub elapsed_ms: Option<u64>,
}

impl From<&ProbeSnapshot> for ProbeResponse {
    fn from(snapshot: &ProbeSnapshot) -> Self {
        Self {
            attempt_id: snapshot.attempt_id.map(uuid::Uuid::from),
            status: snapshot.status,
            note: snapshot.note.clone(),
            outcome: snapshot.outcome.map(str::to_string),
            socket_url: snapshot.socket_url.clone(),
            started_at: snapshot.started_at,
            updated_at: snapshot.updated_at,
            elapsed_ms: snapshot.elapsed_ms,
        }
    }
}

/// Response body for `POST /api/v1/celebrate`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CelebrateResponse {
    /// Whether a celebration window is open.
    pub active: bool,
    /// Window length in milliseconds.
    pub duration_ms: u64,
}
