//! Connection prober: one-shot WebSocket handshake check.
//!
//! A probe opens a socket to the derived chat endpoint and waits for the
//! voice server's readiness frame (a binary frame whose first byte is
//! [`HANDSHAKE_MARKER`]). The first of timeout, handshake, socket error or
//! socket close settles the attempt; nothing after that is observed.

pub mod handshake;
pub mod prober;

pub use handshake::{HANDSHAKE_MARKER, await_handshake, is_handshake_frame};
pub use prober::Prober;
