//! File-backed settings: the saved server address and the embed toggle.
//!
//! Only the address survives a restart. It is read once at startup and
//! rewritten on every change; there is no explicit save step and no
//! validation gate. The embed toggle lives for the process only.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use super::models::StoredSettings;
use crate::domain::ServerAddress;
use crate::error::HubError;

/// Settings store backed by a small JSON file.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    address: RwLock<ServerAddress>,
    embed_enabled: AtomicBool,
}

impl SettingsStore {
    /// Loads the saved address from `path`, falling back to
    /// `default_address` when the file is missing, malformed, or has no
    /// saved value.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::SettingsError`] if the file exists but cannot be
    /// read.
    pub async fn load(
        path: impl Into<PathBuf>,
        default_address: &str,
        embed_enabled: bool,
    ) -> Result<Self, HubError> {
        let path = path.into();
        let saved = read_settings(&path).await?;
        let address = match saved.server_url {
            Some(raw) => {
                tracing::info!(path = %path.display(), "loaded saved server address");
                ServerAddress::new(raw)
            }
            None => ServerAddress::new(default_address),
        };
        Ok(Self {
            path: Some(path),
            address: RwLock::new(address),
            embed_enabled: AtomicBool::new(embed_enabled),
        })
    }

    /// Creates a store that never touches the filesystem.
    #[must_use]
    pub fn in_memory(address: impl Into<ServerAddress>, embed_enabled: bool) -> Self {
        Self {
            path: None,
            address: RwLock::new(address.into()),
            embed_enabled: AtomicBool::new(embed_enabled),
        }
    }

    /// Returns the settings file path, if the store is file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the current server address.
    pub async fn address(&self) -> ServerAddress {
        self.address.read().await.clone()
    }

    /// Replaces the server address and writes it to disk.
    ///
    /// The in-memory value changes even if the write fails, so the running
    /// hub always reflects the latest edit.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::SettingsError`] if the settings file cannot be
    /// written.
    pub async fn set_address(&self, address: ServerAddress) -> Result<(), HubError> {
        let mut current = self.address.write().await;
        *current = address;
        if let Some(path) = &self.path {
            let stored = StoredSettings {
                server_url: Some(current.raw().to_string()),
            };
            write_settings(path, &stored).await?;
            tracing::debug!(path = %path.display(), "saved server address");
        }
        Ok(())
    }

    /// Returns whether the voice UI embed is shown.
    #[must_use]
    pub fn embed_enabled(&self) -> bool {
        self.embed_enabled.load(Ordering::SeqCst)
    }

    /// Turns the voice UI embed on or off.
    pub fn set_embed_enabled(&self, enabled: bool) {
        self.embed_enabled.store(enabled, Ordering::SeqCst);
    }
}

async fn read_settings(path: &Path) -> Result<StoredSettings, HubError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(StoredSettings::default());
        }
        Err(err) => {
            return Err(HubError::SettingsError(format!(
                "reading {}: {err}",
                path.display()
            )));
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(stored) => Ok(stored),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring malformed settings file");
            Ok(StoredSettings::default())
        }
    }
}

/// Writes through a sibling temp file and renames it into place.
async fn write_settings(path: &Path, stored: &StoredSettings) -> Result<(), HubError> {
    let json = serde_json::to_vec_pretty(stored)
        .map_err(|e| HubError::SettingsError(format!("encoding settings: {e}")))?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, json).await.map_err(|e| {
        HubError::SettingsError(format!("writing {}: {e}", tmp.display()))
    })?;
    tokio::fs::rename(&tmp, path).await.map_err(|e| {
        HubError::SettingsError(format!("replacing {}: {e}", path.display()))
    })?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const DEFAULT: &str = "https://default.example";

    fn temp_dir() -> tempfile::TempDir {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("temp dir");
        };
        dir
    }

    async fn load(path: &Path) -> SettingsStore {
        let Ok(store) = SettingsStore::load(path, DEFAULT, true).await else {
            panic!("load failed");
        };
        store
    }

    #[tokio::test]
    async fn missing_file_uses_default() {
        let dir = temp_dir();
        let store = load(&dir.path().join("settings.json")).await;
        assert_eq!(store.address().await.raw(), DEFAULT);
        assert!(store.embed_enabled());
    }

    #[tokio::test]
    async fn saved_address_survives_reload() {
        let dir = temp_dir();
        let path = dir.path().join("settings.json");

        let store = load(&path).await;
        let saved = store.set_address(ServerAddress::new("voice.example:8998")).await;
        assert!(saved.is_ok());
        drop(store);

        let reloaded = load(&path).await;
        assert_eq!(reloaded.address().await.raw(), "voice.example:8998");
    }

    #[tokio::test]
    async fn blank_address_is_saved_as_is() {
        let dir = temp_dir();
        let path = dir.path().join("settings.json");

        let store = load(&path).await;
        assert!(store.set_address(ServerAddress::new("")).await.is_ok());

        let reloaded = load(&path).await;
        assert!(reloaded.address().await.is_unset());
    }

    #[tokio::test]
    async fn malformed_file_falls_back_to_default() {
        let dir = temp_dir();
        let path = dir.path().join("settings.json");
        let Ok(()) = tokio::fs::write(&path, b"not json").await else {
            panic!("write failed");
        };

        let store = load(&path).await;
        assert_eq!(store.address().await.raw(), DEFAULT);
    }

    #[tokio::test]
    async fn unwritable_path_reports_error_but_keeps_value() {
        let dir = temp_dir();
        let path = dir.path().join("missing-dir").join("settings.json");

        let store = load(&path).await;
        let result = store.set_address(ServerAddress::new("kept.example")).await;
        assert!(matches!(result, Err(HubError::SettingsError(_))));
        assert_eq!(store.address().await.raw(), "kept.example");
    }

    #[tokio::test]
    async fn embed_toggle_is_session_only() {
        let store = SettingsStore::in_memory("example.com", true);
        store.set_embed_enabled(false);
        assert!(!store.embed_enabled());
        assert!(store.path().is_none());
    }
}
