//! Persistence layer: the saved server address.
//!
//! The hub's only durable state is one key-value pair kept in a JSON
//! settings file. [`SettingsStore`] reads it at startup and rewrites it on
//! every change.

pub mod models;
pub mod settings_store;

pub use models::StoredSettings;
pub use settings_store::SettingsStore;
