//! # voice-hub
//!
//! Connection hub for a remotely hosted voice-AI server.
//!
//! The hub keeps one saved server address, derives the chat and WebSocket
//! endpoints for it, checks reachability with a one-shot WebSocket
//! handshake probe, and serves a page that embeds the remote server's own
//! UI. The voice protocol itself is opaque: the only thing the hub reads
//! from the server is its readiness frame (first byte `0x00`).
//!
//! ## Architecture
//!
//! ```text
//! Clients (browser, HTTP, WebSocket, CLI)
//!     │
//!     ├── Page + REST Handlers (api/)
//!     ├── WS Feed (ws/)
//!     │
//!     ├── ProbeService + Celebration (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── Prober (probe/) ──► remote voice server /api/chat
//!     │
//!     └── SettingsStore (persistence/, JSON file)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod probe;
pub mod service;
pub mod ws;

#[cfg(test)]
pub(crate) mod test_support;
