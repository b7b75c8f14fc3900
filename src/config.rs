//! Hub configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Every key except `LISTEN_ADDR` falls
//! back to its default when missing or unparsable.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::HubError;

/// Server address used when nothing has been saved yet.
pub const DEFAULT_SERVER_URL: &str = "https://your-railway-app.up.railway.app";

/// Top-level hub configuration.
///
/// Loaded once at startup via [`HubConfig::from_env`].
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Voice server address used when the settings file has none.
    pub default_server_url: String,

    /// Path of the JSON settings file holding the saved address.
    pub settings_path: PathBuf,

    /// Milliseconds a probe may take from connect to handshake.
    pub probe_timeout_ms: u64,

    /// Milliseconds a celebration window stays open.
    pub celebration_ms: u64,

    /// Whether the hub page embeds the voice server UI at startup.
    pub embed_enabled: bool,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Seconds before an HTTP request is aborted.
    pub request_timeout_secs: u64,
}

impl HubConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::ConfigError`] if `LISTEN_ADDR` is set but cannot
    /// be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, HubError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| HubError::ConfigError(format!("LISTEN_ADDR {raw:?}: {e}")))?,
            Err(_) => defaults.listen_addr,
        };

        let default_server_url =
            std::env::var("PERSONAPLEX_URL").unwrap_or(defaults.default_server_url);
        let settings_path = std::env::var("SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.settings_path);

        Ok(Self {
            listen_addr,
            default_server_url,
            settings_path,
            probe_timeout_ms: parse_env("PROBE_TIMEOUT_MS", defaults.probe_timeout_ms),
            celebration_ms: parse_env("CELEBRATION_MS", defaults.celebration_ms),
            embed_enabled: parse_env_bool("EMBED_ENABLED", defaults.embed_enabled),
            event_bus_capacity: parse_env("EVENT_BUS_CAPACITY", defaults.event_bus_capacity),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
        })
    }

    /// Probe deadline as a [`Duration`].
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Celebration window as a [`Duration`].
    #[must_use]
    pub const fn celebration_duration(&self) -> Duration {
        Duration::from_millis(self.celebration_ms)
    }

    /// HTTP request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            default_server_url: DEFAULT_SERVER_URL.to_string(),
            settings_path: PathBuf::from("voice-hub-settings.json"),
            probe_timeout_ms: 5_000,
            celebration_ms: 1_800,
            embed_enabled: true,
            event_bus_capacity: 1_024,
            request_timeout_secs: 30,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = HubConfig::default();
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.celebration_duration(), Duration::from_millis(1800));
        assert_eq!(config.default_server_url, DEFAULT_SERVER_URL);
        assert!(config.embed_enabled);
        assert_eq!(config.listen_addr.port(), 3000);
    }

    #[test]
    fn missing_variables_fall_back() {
        assert_eq!(parse_env("VOICE_HUB_TEST_UNSET_NUMBER", 7_u64), 7);
        assert!(parse_env_bool("VOICE_HUB_TEST_UNSET_FLAG", true));
        assert!(!parse_env_bool("VOICE_HUB_TEST_UNSET_FLAG", false));
    }
}
