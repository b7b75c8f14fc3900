//! Socket-level probe: connect, await the handshake, close.

use std::time::Duration;

use tokio::time::Instant;
use tokio_tungstenite::connect_async;
use url::Url;

use super::handshake::{await_handshake, classify_error};
use crate::domain::ProbeOutcome;

/// Runs single probe attempts against a voice server socket.
///
/// The deadline covers the whole attempt: TCP and TLS connect, the
/// WebSocket upgrade, and the wait for the readiness frame.
#[derive(Debug, Clone, Copy)]
pub struct Prober {
    timeout: Duration,
}

impl Prober {
    /// Creates a prober with the given per-attempt deadline.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Returns the per-attempt deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probes `socket_url` once and returns how the attempt settled.
    ///
    /// The socket is closed after a handshake or a timeout. No retries.
    pub async fn probe(&self, socket_url: &Url) -> ProbeOutcome {
        let started = Instant::now();
        let outcome = self.connect_and_wait(socket_url, started + self.timeout).await;
        tracing::info!(
            url = %socket_url,
            outcome = outcome.kind(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "probe settled"
        );
        outcome
    }

    async fn connect_and_wait(&self, socket_url: &Url, deadline: Instant) -> ProbeOutcome {
        let connect = connect_async(socket_url.as_str());
        let mut socket = match tokio::time::timeout_at(deadline, connect).await {
            Err(_) => return ProbeOutcome::TimedOut,
            Ok(Err(err)) => {
                tracing::debug!(error = %err, "websocket connect failed");
                return classify_error(&err);
            }
            Ok(Ok((socket, response))) => {
                tracing::debug!(status = %response.status(), "websocket upgraded");
                socket
            }
        };

        let outcome = await_handshake(&mut socket, deadline).await;
        if matches!(outcome, ProbeOutcome::Connected | ProbeOutcome::TimedOut)
            && let Err(err) = socket.close(None).await
        {
            tracing::debug!(error = %err, "closing probe socket failed");
        }
        outcome
    }
}
