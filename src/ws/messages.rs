//! WebSocket message types: envelope and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::EventTopic;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server-initiated event.
    #[must_use]
    pub fn event(payload: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: WsMessageType::Event,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds the response to command `id`.
    #[must_use]
    pub fn response(id: String, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Response,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error reply to command `id`.
    #[must_use]
    pub fn error(id: String, code: u16, message: &str) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Error,
            timestamp: Utc::now(),
            payload: serde_json::json!({
                "code": code,
                "message": message,
            }),
        }
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket, carried in the
/// envelope payload under the `command` key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Receive events for the given topics.
    Subscribe {
        /// Topics to add.
        topics: Vec<EventTopic>,
    },
    /// Stop receiving events for the given topics.
    Unsubscribe {
        /// Topics to remove.
        topics: Vec<EventTopic>,
    },
    /// Start a probe of the saved address, or of `server_url` if given.
    Probe {
        /// Address override (not saved).
        #[serde(default)]
        server_url: Option<String>,
    },
    /// Open a celebration window.
    Celebrate,
    /// Return the latest probe state.
    GetState,
}

impl WsCommand {
    /// Every accepted `command` value.
    pub const NAMES: [&'static str; 5] =
        ["subscribe", "unsubscribe", "probe", "celebrate", "get_state"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_payload() {
        let probe: Result<WsCommand, _> =
            serde_json::from_value(serde_json::json!({"command": "probe"}));
        assert!(matches!(probe, Ok(WsCommand::Probe { server_url: None })));

        let subscribe: Result<WsCommand, _> = serde_json::from_value(
            serde_json::json!({"command": "subscribe", "topics": ["probe", "celebration"]}),
        );
        assert!(matches!(
            subscribe,
            Ok(WsCommand::Subscribe { topics }) if topics == [EventTopic::Probe, EventTopic::Celebration]
        ));
    }

    #[test]
    fn error_payload_carries_code() {
        let msg = WsMessage::error("c1".to_string(), 404, "unknown command");
        assert_eq!(msg.msg_type, WsMessageType::Error);
        assert_eq!(msg.payload["code"], 404);
    }
}
