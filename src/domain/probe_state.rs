//! Probe status, outcomes and the snapshot readers observe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AttemptId;

/// Note shown before any probe has run.
pub const NOTE_IDLE: &str = "Not checked yet.";
/// Note shown while an attempt is in flight.
pub const NOTE_CHECKING: &str = "Connecting to your PersonaPlex server...";

/// Visible probe state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// No probe has run since startup.
    Idle,
    /// An attempt is in flight.
    Checking,
    /// The last attempt received the handshake marker.
    Connected,
    /// The last attempt failed.
    Failed,
}

impl ProbeStatus {
    /// Returns `true` for the states an attempt ends in.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Connected | Self::Failed)
    }

    /// Returns the snake_case name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Checking => "checking",
            Self::Connected => "connected",
            Self::Failed => "failed",
        }
    }
}

/// How a single probe attempt settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A binary frame starting with the handshake marker arrived.
    Connected,
    /// The address was blank or not a URL; no connection was attempted.
    NoAddress,
    /// Nothing settled the attempt before the deadline.
    TimedOut,
    /// Connecting or reading failed at the transport level.
    TransportError(String),
    /// The server closed the socket before sending the handshake.
    ClosedEarly,
}

impl ProbeOutcome {
    /// Maps the outcome to the terminal status it produces.
    #[must_use]
    pub const fn status(&self) -> ProbeStatus {
        match self {
            Self::Connected => ProbeStatus::Connected,
            _ => ProbeStatus::Failed,
        }
    }

    /// Human-readable note for the outcome.
    #[must_use]
    pub const fn note(&self) -> &'static str {
        match self {
            Self::Connected => "Handshake received. Server is ready.",
            Self::NoAddress => "Add a valid server URL first.",
            Self::TimedOut => "Timed out. Check the server URL or deployment logs.",
            Self::TransportError(_) => "Connection failed. Verify SSL and firewall settings.",
            Self::ClosedEarly => "Socket closed before handshake.",
        }
    }

    /// Short machine-readable label, used in logs and events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::NoAddress => "no_address",
            Self::TimedOut => "timed_out",
            Self::TransportError(_) => "transport_error",
            Self::ClosedEarly => "closed_early",
        }
    }
}

/// Latest probe state as seen by readers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeSnapshot {
    /// Attempt that produced this state; `None` while idle.
    pub attempt_id: Option<AttemptId>,
    /// Visible status.
    pub status: ProbeStatus,
    /// Human-readable status note.
    pub note: String,
    /// Failure kind for settled attempts (`None` otherwise).
    pub outcome: Option<&'static str>,
    /// Derived socket URL the attempt connected to, if any.
    pub socket_url: Option<String>,
    /// When the attempt started.
    pub started_at: Option<DateTime<Utc>>,
    /// When this snapshot was produced.
    pub updated_at: DateTime<Utc>,
    /// Time from start to settlement, for settled attempts.
    pub elapsed_ms: Option<u64>,
}

impl ProbeSnapshot {
    /// The state before any probe has run.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            attempt_id: None,
            status: ProbeStatus::Idle,
            note: NOTE_IDLE.to_string(),
            outcome: None,
            socket_url: None,
            started_at: None,
            updated_at: Utc::now(),
            elapsed_ms: None,
        }
    }

    /// The state of an attempt that has just opened its socket.
    #[must_use]
    pub fn checking(attempt_id: AttemptId, socket_url: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            attempt_id: Some(attempt_id),
            status: ProbeStatus::Checking,
            note: NOTE_CHECKING.to_string(),
            outcome: None,
            socket_url: Some(socket_url.to_string()),
            started_at: Some(started_at),
            updated_at: started_at,
            elapsed_ms: None,
        }
    }

    /// The terminal state of an attempt.
    #[must_use]
    pub fn settled(
        attempt_id: AttemptId,
        outcome: &ProbeOutcome,
        socket_url: Option<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let updated_at = Utc::now();
        let elapsed_ms = (updated_at - started_at).num_milliseconds().max(0) as u64;
        Self {
            attempt_id: Some(attempt_id),
            status: outcome.status(),
            note: outcome.note().to_string(),
            outcome: Some(outcome.kind()),
            socket_url,
            started_at: Some(started_at),
            updated_at,
            elapsed_ms: Some(elapsed_ms),
        }
    }

    /// Returns `true` if this snapshot belongs to `attempt_id`.
    #[must_use]
    pub fn is_attempt(&self, attempt_id: AttemptId) -> bool {
        self.attempt_id == Some(attempt_id)
    }
}

impl Default for ProbeSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_handshake_connects() {
        assert_eq!(ProbeOutcome::Connected.status(), ProbeStatus::Connected);
        for outcome in [
            ProbeOutcome::NoAddress,
            ProbeOutcome::TimedOut,
            ProbeOutcome::TransportError("refused".to_string()),
            ProbeOutcome::ClosedEarly,
        ] {
            assert_eq!(outcome.status(), ProbeStatus::Failed);
        }
    }

    #[test]
    fn failure_notes_are_distinct() {
        let notes = [
            ProbeOutcome::NoAddress.note(),
            ProbeOutcome::TimedOut.note(),
            ProbeOutcome::TransportError(String::new()).note(),
            ProbeOutcome::ClosedEarly.note(),
        ];
        for (i, a) in notes.iter().enumerate() {
            for b in notes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn idle_is_not_terminal() {
        let snapshot = ProbeSnapshot::idle();
        assert_eq!(snapshot.status, ProbeStatus::Idle);
        assert_eq!(snapshot.note, NOTE_IDLE);
        assert!(!snapshot.status.is_terminal());
        assert!(!ProbeStatus::Checking.is_terminal());
    }

    #[test]
    fn checking_snapshot_names_the_server() {
        let id = AttemptId::new();
        let snapshot = ProbeSnapshot::checking(id, "wss://example.com/api/chat", Utc::now());
        assert_eq!(snapshot.status, ProbeStatus::Checking);
        assert_eq!(snapshot.note, "Connecting to your PersonaPlex server...");
        assert_eq!(snapshot.socket_url.as_deref(), Some("wss://example.com/api/chat"));
    }

    #[test]
    fn settled_snapshot_records_outcome() {
        let id = AttemptId::new();
        let started = Utc::now();
        let snapshot = ProbeSnapshot::settled(id, &ProbeOutcome::TimedOut, None, started);
        assert!(snapshot.is_attempt(id));
        assert_eq!(snapshot.status, ProbeStatus::Failed);
        assert_eq!(snapshot.outcome, Some("timed_out"));
        assert!(snapshot.elapsed_ms.is_some());
    }
}
