//! Settings DTOs: the saved address and everything derived from it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ChatParams, ServerAddress};

/// Response body for `GET /api/v1/settings` and `PUT /api/v1/settings`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    /// Raw address as entered.
    pub server_url: String,
    /// Normalized base address; empty when unset.
    pub normalized_url: String,
    /// Derived chat endpoint, or `null` when the address is unusable.
    pub chat_url: Option<String>,
    /// Derived WebSocket endpoint, or `null` when the address is unusable.
    pub socket_url: Option<String>,
    /// Why the address is unusable, if it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_error: Option<String>,
    /// Whether the voice UI embed is shown.
    pub embed_enabled: bool,
    /// Iframe source when the embed is shown and the address is set.
    pub embed_url: Option<String>,
}

impl SettingsResponse {
    /// Derives the response from the saved address.
    #[must_use]
    pub fn build(address: &ServerAddress, params: &ChatParams, embed_enabled: bool) -> Self {
        let normalized_url = address.normalized();
        let (chat_url, socket_url, address_error) =
            match (address.chat_url(params), address.socket_url(params)) {
                (Ok(chat), Ok(socket)) => (Some(chat.to_string()), Some(socket.to_string()), None),
                (Err(err), _) | (_, Err(err)) => (None, None, Some(err.to_string())),
            };
        let embed_url = (embed_enabled && !normalized_url.is_empty()).then(|| normalized_url.clone());
        Self {
            server_url: address.raw().to_string(),
            normalized_url,
            chat_url,
            socket_url,
            address_error,
            embed_enabled,
            embed_url,
        }
    }
}

/// Request body for `PUT /api/v1/settings`. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    /// New raw server address. Saved as-is, without validation.
    #[serde(default)]
    pub server_url: Option<String>,
    /// New embed toggle state.
    #[serde(default)]
    pub embed_enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_address_has_no_endpoints() {
        let response = SettingsResponse::build(&ServerAddress::new(""), &ChatParams::DEFAULT, true);
        assert_eq!(response.normalized_url, "");
        assert_eq!(response.socket_url, None);
        assert_eq!(response.embed_url, None);
        assert!(response.address_error.is_some());
    }

    #[test]
    fn embed_points_at_normalized_address() {
        let address = ServerAddress::new("voice.example");
        let response = SettingsResponse::build(&address, &ChatParams::DEFAULT, true);
        assert_eq!(response.embed_url.as_deref(), Some("https://voice.example"));
        assert!(
            response
                .socket_url
                .as_deref()
                .is_some_and(|url| url.starts_with("wss://voice.example/api/chat?"))
        );

        let hidden = SettingsResponse::build(&address, &ChatParams::DEFAULT, false);
        assert_eq!(hidden.embed_url, None);
    }
}
