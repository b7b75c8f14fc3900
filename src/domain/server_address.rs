//! Server address normalization and endpoint derivation.
//!
//! The user-facing address is a loose string ("example.com",
//! "https://host/base/"). [`ServerAddress`] keeps the raw text as entered
//! and derives, on demand, the normalized base URL, the chat endpoint and
//! the WebSocket endpoint the prober connects to. Nothing derived is ever
//! stored.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::ChatParams;
use crate::error::HubError;

/// Path segment appended to the base address for the chat endpoint.
pub const CHAT_PATH: &str = "/api/chat";

/// Raw server address exactly as the user entered it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerAddress(String);

impl ServerAddress {
    /// Wraps a raw address string without validating it.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw address text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Returns the normalized base address (see [`normalize`]).
    #[must_use]
    pub fn normalized(&self) -> String {
        normalize(&self.0)
    }

    /// Returns `true` if the address normalizes to the empty string.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Derives the HTTP(S) chat endpoint carrying `params` in its query.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::AddressUnset`] for a blank address and
    /// [`HubError::InvalidAddress`] if the normalized text is not a URL.
    pub fn chat_url(&self, params: &ChatParams) -> Result<Url, HubError> {
        let normalized = self.normalized();
        if normalized.is_empty() {
            return Err(HubError::AddressUnset);
        }
        let mut url = Url::parse(&normalized)
            .map_err(|e| HubError::InvalidAddress(format!("{normalized}: {e}")))?;

        let path = join_path(url.path(), CHAT_PATH);
        url.set_path(&path);

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !params.is_managed(key))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .extend_pairs(params.query_pairs());

        Ok(url)
    }

    /// Derives the WebSocket endpoint: the chat URL with `https` mapped to
    /// `wss` and `http` mapped to `ws`.
    ///
    /// # Errors
    ///
    /// Fails exactly when [`ServerAddress::chat_url`] fails.
    pub fn socket_url(&self, params: &ChatParams) -> Result<Url, HubError> {
        let mut url = self.chat_url(params)?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|()| HubError::InvalidAddress(format!("cannot use scheme {scheme}")))?;
        Ok(url)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ServerAddress {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for ServerAddress {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Trims `address` and prefixes `https://` when it carries no HTTP scheme.
///
/// Blank input yields the empty string. Input starting with `http://` or
/// `https://` (any case) is returned trimmed but otherwise unchanged. No
/// host validation happens here.
#[must_use]
pub fn normalize(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if has_http_scheme(trimmed) {
        return trimmed.to_string();
    }
    format!("https://{trimmed}")
}

fn has_http_scheme(text: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        text.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Joins two path fragments with exactly one `/` between them.
fn join_path(base: &str, sub: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let joined = if sub.starts_with('/') {
        format!("{base}{sub}")
    } else {
        format!("{base}/{sub}")
    };
    if joined.is_empty() { "/".to_string() } else { joined }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn chat(raw: &str) -> Url {
        let Ok(url) = ServerAddress::new(raw).chat_url(&ChatParams::DEFAULT) else {
            panic!("expected chat url for {raw}");
        };
        url
    }

    fn query_value(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    #[test]
    fn bare_host_gets_https() {
        assert_eq!(normalize("example.com"), "https://example.com");
        assert_eq!(normalize("  host:8998/base "), "https://host:8998/base");
    }

    #[test]
    fn existing_scheme_is_kept_in_any_case() {
        for raw in [
            "http://example.com",
            "https://example.com",
            "HTTP://example.com",
            "HtTpS://example.com/x",
        ] {
            assert_eq!(normalize(raw), raw);
        }
    }

    #[test]
    fn other_schemes_are_treated_as_hosts() {
        assert_eq!(normalize("ws://example.com"), "https://ws://example.com");
    }

    #[test]
    fn blank_normalizes_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert!(ServerAddress::new(" ").is_unset());
    }

    #[test]
    fn blank_address_has_no_endpoints() {
        let address = ServerAddress::new("");
        assert!(matches!(
            address.chat_url(&ChatParams::DEFAULT),
            Err(HubError::AddressUnset)
        ));
        assert!(matches!(
            address.socket_url(&ChatParams::DEFAULT),
            Err(HubError::AddressUnset)
        ));
    }

    #[test]
    fn unparsable_address_is_rejected() {
        let address = ServerAddress::new("exa mple.com");
        assert!(matches!(
            address.socket_url(&ChatParams::DEFAULT),
            Err(HubError::InvalidAddress(_))
        ));
    }

    #[test]
    fn chat_url_carries_fixed_parameters() {
        let url = chat("example.com");
        assert_eq!(url.scheme(), "https");
        assert!(url.path().ends_with("/api/chat"));
        assert_eq!(query_value(&url, "voice_prompt").as_deref(), Some("NATF0.pt"));
        assert_eq!(query_value(&url, "text_seed").as_deref(), Some("42"));
        assert_eq!(query_value(&url, "audio_seed").as_deref(), Some("42"));
        assert_eq!(query_value(&url, "repetition_penalty").as_deref(), Some("1.1"));
        assert_eq!(
            query_value(&url, "text_prompt").as_deref(),
            Some("You enjoy having a good conversation.")
        );
        assert_eq!(url.query_pairs().count(), crate::domain::CHAT_PARAM_COUNT);
    }

    #[test]
    fn chat_path_merges_with_base_path() {
        assert_eq!(chat("https://example.com").path(), "/api/chat");
        assert_eq!(chat("https://example.com/").path(), "/api/chat");
        assert_eq!(chat("https://example.com/voice").path(), "/voice/api/chat");
        assert_eq!(chat("https://example.com/voice/").path(), "/voice/api/chat");
    }

    #[test]
    fn unrelated_query_is_kept_and_managed_keys_are_overridden() {
        let url = chat("https://example.com/?token=abc&text_seed=7");
        assert_eq!(query_value(&url, "token").as_deref(), Some("abc"));
        assert_eq!(query_value(&url, "text_seed").as_deref(), Some("42"));
        assert_eq!(
            url.query_pairs().filter(|(key, _)| key == "text_seed").count(),
            1
        );
    }

    #[test]
    fn socket_scheme_follows_http_scheme() {
        let params = ChatParams::DEFAULT;
        let Ok(secure) = ServerAddress::new("https://example.com").socket_url(&params) else {
            panic!("expected socket url");
        };
        let Ok(plain) = ServerAddress::new("http://example.com").socket_url(&params) else {
            panic!("expected socket url");
        };
        let Ok(bare) = ServerAddress::new("example.com").socket_url(&params) else {
            panic!("expected socket url");
        };
        assert_eq!(secure.scheme(), "wss");
        assert_eq!(plain.scheme(), "ws");
        assert_eq!(bare.scheme(), "wss");
        assert_eq!(secure.path(), "/api/chat");
        assert_eq!(secure.query(), chat("https://example.com").query());
    }

    #[test]
    fn socket_url_keeps_port() {
        let Ok(url) = ServerAddress::new("http://127.0.0.1:8998").socket_url(&ChatParams::DEFAULT)
        else {
            panic!("expected socket url");
        };
        assert_eq!(url.port(), Some(8998));
        assert!(url.as_str().starts_with("ws://127.0.0.1:8998/api/chat?"));
    }
}
