//! On-disk model of the settings file.

use serde::{Deserialize, Serialize};

/// Key under which the server address is saved.
pub const SERVER_URL_KEY: &str = "aivoice_server_url";

/// Contents of the JSON settings file.
///
/// ```json
/// { "aivoice_server_url": "https://voice.example.com" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSettings {
    /// Raw server address as last entered; absent when never saved.
    #[serde(rename = "aivoice_server_url", default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_single_documented_key() {
        let stored = StoredSettings {
            server_url: Some("example.com".to_string()),
        };
        let json = serde_json::to_value(&stored).unwrap_or_default();
        assert_eq!(json[SERVER_URL_KEY], "example.com");
        assert_eq!(json.as_object().map(|o| o.len()), Some(1));
    }

    #[test]
    fn missing_key_reads_as_unsaved() {
        let stored: StoredSettings = serde_json::from_str("{}").unwrap_or_default();
        assert_eq!(stored.server_url, None);
    }
}
