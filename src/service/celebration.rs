//! Celebration window: a timed event pair on the bus.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{CelebrationReason, EventBus, HubEvent};

/// Opens celebration windows and closes them after a fixed duration.
///
/// Re-triggering while a window is open restarts it: only the latest
/// trigger emits [`HubEvent::CelebrationEnded`].
#[derive(Debug, Clone)]
pub struct Celebration {
    duration: Duration,
    event_bus: EventBus,
    window: Arc<Mutex<Window>>,
}

/// Generation of the latest trigger and whether its window is open.
///
/// Events are published while the lock is held, so bus order matches the
/// order in which windows open and close.
#[derive(Debug, Default)]
struct Window {
    generation: u64,
    open: bool,
}

impl Celebration {
    /// Creates a celebration timer publishing on `event_bus`.
    #[must_use]
    pub fn new(duration: Duration, event_bus: EventBus) -> Self {
        Self {
            duration,
            event_bus,
            window: Arc::new(Mutex::new(Window::default())),
        }
    }

    /// Returns the window length.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns `true` while a window is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.window.lock().open
    }

    /// Opens (or restarts) the celebration window.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&self, reason: CelebrationReason) {
        let generation = {
            let mut window = self.window.lock();
            window.generation += 1;
            window.open = true;
            let _ = self.event_bus.publish(HubEvent::CelebrationStarted {
                reason,
                duration_ms: self.duration.as_millis() as u64,
                timestamp: Utc::now(),
            });
            window.generation
        };
        tracing::debug!(?reason, generation, "celebration started");

        let window = Arc::clone(&self.window);
        let event_bus = self.event_bus.clone();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut window = window.lock();
            if window.generation != generation || !window.open {
                return;
            }
            window.open = false;
            let _ = event_bus.publish(HubEvent::CelebrationEnded {
                timestamp: Utc::now(),
            });
        });
    }
}
