//! Probe supervisor: starts attempts, supersedes stale ones, publishes state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::AbortHandle;
use url::Url;

use super::Celebration;
use crate::domain::{
    AttemptId, CelebrationReason, ChatParams, EventBus, HubEvent, ProbeOutcome, ProbeSnapshot,
    ServerAddress,
};
use crate::error::HubError;
use crate::probe::Prober;

/// Orchestration layer for probe attempts.
///
/// Owns the latest [`ProbeSnapshot`] behind a `watch` channel. Each call to
/// [`ProbeService::start_probe`] bumps the attempt generation and aborts
/// the attempt still in flight, so only the newest attempt can settle the
/// visible state or trigger the celebration.
#[derive(Debug)]
pub struct ProbeService {
    prober: Prober,
    params: ChatParams,
    event_bus: EventBus,
    celebration: Celebration,
    state: Arc<watch::Sender<ProbeSnapshot>>,
    generation: Arc<AtomicU64>,
    in_flight: Mutex<Option<InFlight>>,
}

#[derive(Debug)]
struct InFlight {
    attempt_id: AttemptId,
    handle: AbortHandle,
}

/// Everything a spawned attempt needs to settle itself.
#[derive(Debug)]
struct Attempt {
    attempt_id: AttemptId,
    generation: u64,
    socket_url: Url,
    started_at: DateTime<Utc>,
    prober: Prober,
    state: Arc<watch::Sender<ProbeSnapshot>>,
    latest: Arc<AtomicU64>,
    event_bus: EventBus,
    celebration: Celebration,
}

impl ProbeService {
    /// Creates a `ProbeService` starting in the idle state.
    #[must_use]
    pub fn new(
        prober: Prober,
        params: ChatParams,
        event_bus: EventBus,
        celebration: Celebration,
    ) -> Self {
        let (state, _) = watch::channel(ProbeSnapshot::idle());
        Self {
            prober,
            params,
            event_bus,
            celebration,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: Mutex::new(None),
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns the latest snapshot.
    #[must_use]
    pub fn current(&self) -> ProbeSnapshot {
        self.state.borrow().clone()
    }

    /// Returns a receiver that observes every state replacement.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProbeSnapshot> {
        self.state.subscribe()
    }

    /// Starts a probe of `address` and returns the resulting snapshot.
    ///
    /// An unusable address settles `failed` immediately with no network
    /// activity. Otherwise the snapshot is `checking` and the attempt runs
    /// in the background. Any earlier attempt still in flight is aborted.
    pub async fn start_probe(&self, address: &ServerAddress) -> ProbeSnapshot {
        let attempt_id = AttemptId::new();
        let started_at = Utc::now();

        let mut in_flight = self.in_flight.lock().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = in_flight.take() {
            previous.handle.abort();
            tracing::info!(
                superseded = %previous.attempt_id,
                by = %attempt_id,
                "probe superseded by newer attempt"
            );
        }

        let socket_url = match address.socket_url(&self.params) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(address = %address, error = %err, "probe skipped: unusable address");
                let snapshot =
                    ProbeSnapshot::settled(attempt_id, &ProbeOutcome::NoAddress, None, started_at);
                self.state.send_replace(snapshot.clone());
                publish_settled(&self.event_bus, &snapshot, &ProbeOutcome::NoAddress);
                return snapshot;
            }
        };

        let snapshot = ProbeSnapshot::checking(attempt_id, socket_url.as_str(), started_at);
        self.state.send_replace(snapshot.clone());
        let _ = self.event_bus.publish(HubEvent::ProbeStarted {
            attempt_id,
            socket_url: socket_url.to_string(),
            timestamp: started_at,
        });
        tracing::info!(%attempt_id, url = %socket_url, "probe started");

        let attempt = Attempt {
            attempt_id,
            generation,
            socket_url,
            started_at,
            prober: self.prober,
            state: Arc::clone(&self.state),
            latest: Arc::clone(&self.generation),
            event_bus: self.event_bus.clone(),
            celebration: self.celebration.clone(),
        };
        let task = tokio::spawn(attempt.run());
        *in_flight = Some(InFlight {
            attempt_id,
            handle: task.abort_handle(),
        });

        snapshot
    }

    /// Waits until `attempt_id` settles or a newer attempt replaces it, and
    /// returns the snapshot at that point.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Internal`] if the state channel is closed, which
    /// only happens while the service is being dropped.
    pub async fn wait_settled(&self, attempt_id: AttemptId) -> Result<ProbeSnapshot, HubError> {
        let mut rx = self.state.subscribe();
        let snapshot = rx
            .wait_for(|s| !s.is_attempt(attempt_id) || s.status.is_terminal())
            .await
            .map_err(|e| HubError::Internal(format!("probe state channel closed: {e}")))?;
        Ok(snapshot.clone())
    }

    /// Starts a probe and waits for it to settle.
    ///
    /// # Errors
    ///
    /// See [`ProbeService::wait_settled`].
    pub async fn probe_and_wait(&self, address: &ServerAddress) -> Result<ProbeSnapshot, HubError> {
        let snapshot = self.start_probe(address).await;
        match snapshot.attempt_id {
            Some(attempt_id) if !snapshot.status.is_terminal() => {
                self.wait_settled(attempt_id).await
            }
            _ => Ok(snapshot),
        }
    }
}

impl Attempt {
    async fn run(self) {
        let outcome = self.prober.probe(&self.socket_url).await;
        let snapshot = ProbeSnapshot::settled(
            self.attempt_id,
            &outcome,
            Some(self.socket_url.to_string()),
            self.started_at,
        );

        let applied = self.state.send_if_modified(|current| {
            if self.latest.load(Ordering::SeqCst) != self.generation {
                return false;
            }
            *current = snapshot.clone();
            true
        });
        if !applied {
            tracing::debug!(attempt_id = %self.attempt_id, "discarding superseded probe result");
            return;
        }

        publish_settled(&self.event_bus, &snapshot, &outcome);
        if outcome == ProbeOutcome::Connected {
            self.celebration.trigger(CelebrationReason::Handshake);
        }
    }
}

fn publish_settled(event_bus: &EventBus, snapshot: &ProbeSnapshot, outcome: &ProbeOutcome) {
    let Some(attempt_id) = snapshot.attempt_id else {
        return;
    };
    let _ = event_bus.publish(HubEvent::ProbeSettled {
        attempt_id,
        status: snapshot.status,
        outcome: outcome.kind().to_string(),
        note: snapshot.note.clone(),
        elapsed_ms: snapshot.elapsed_ms.unwrap_or(0),
        timestamp: snapshot.updated_at,
    });
}
