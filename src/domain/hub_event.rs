//! Hub events broadcast to WebSocket subscribers.
//!
//! Every visible state change emits a [`HubEvent`] through the
//! [`super::EventBus`]: probe attempts starting and settling, the saved
//! address changing, and the celebration window opening and closing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AttemptId, ProbeStatus};

/// Subscription topic an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventTopic {
    /// Probe attempts.
    Probe,
    /// Saved settings.
    Settings,
    /// Celebration window.
    Celebration,
}

impl EventTopic {
    /// Every topic, in declaration order.
    pub const ALL: [Self; 3] = [Self::Probe, Self::Settings, Self::Celebration];
}

/// What opened a celebration window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CelebrationReason {
    /// A probe received the handshake marker.
    Handshake,
    /// A client asked for it.
    Manual,
}

/// Event emitted after every visible state change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum HubEvent {
    /// A probe attempt opened its socket.
    ProbeStarted {
        /// Attempt identifier.
        attempt_id: AttemptId,
        /// Socket URL being probed.
        socket_url: String,
        /// Start timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A probe attempt settled.
    ProbeSettled {
        /// Attempt identifier.
        attempt_id: AttemptId,
        /// Terminal status.
        status: ProbeStatus,
        /// Machine-readable outcome kind.
        outcome: String,
        /// Human-readable note.
        note: String,
        /// Milliseconds from start to settlement.
        elapsed_ms: u64,
        /// Settlement timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The saved server address changed.
    AddressChanged {
        /// Raw address as entered.
        server_url: String,
        /// Normalized base address (empty when unset).
        normalized_url: String,
        /// Change timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A celebration window opened.
    CelebrationStarted {
        /// Trigger.
        reason: CelebrationReason,
        /// Window length in milliseconds.
        duration_ms: u64,
        /// Start timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The latest celebration window closed.
    CelebrationEnded {
        /// End timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl HubEvent {
    /// Returns the topic this event is filtered under.
    #[must_use]
    pub const fn topic(&self) -> EventTopic {
        match self {
            Self::ProbeStarted { .. } | Self::ProbeSettled { .. } => EventTopic::Probe,
            Self::AddressChanged { .. } => EventTopic::Settings,
            Self::CelebrationStarted { .. } | Self::CelebrationEnded { .. } => {
                EventTopic::Celebration
            }
        }
    }

    /// Returns the `event_type` discriminator string.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ProbeStarted { .. } => "probe_started",
            Self::ProbeSettled { .. } => "probe_settled",
            Self::AddressChanged { .. } => "address_changed",
            Self::CelebrationStarted { .. } => "celebration_started",
            Self::CelebrationEnded { .. } => "celebration_ended",
        }
    }

    /// Returns the attempt this event belongs to, for probe events.
    #[must_use]
    pub const fn attempt_id(&self) -> Option<AttemptId> {
        match self {
            Self::ProbeStarted { attempt_id, .. } | Self::ProbeSettled { attempt_id, .. } => {
                Some(*attempt_id)
            }
            _ => None,
        }
    }
}
