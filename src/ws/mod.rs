//! WebSocket layer: live hub status feed for clients.
//!
//! The endpoint at `/ws` pushes probe, settings and celebration events
//! and accepts commands to subscribe, probe, and celebrate.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
