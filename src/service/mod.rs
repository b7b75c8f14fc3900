//! Service layer: probe orchestration and the celebration timer.
//!
//! Services sit between the HTTP/WebSocket handlers and the domain layer.
//! They own the live probe state and publish events for every change.

pub mod celebration;
pub mod probe_service;

pub use celebration::Celebration;
pub use probe_service::ProbeService;
