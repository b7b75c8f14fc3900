//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::HubConfig;
use crate::domain::{ChatParams, EventBus};
use crate::persistence::SettingsStore;
use crate::probe::Prober;
use crate::service::{Celebration, ProbeService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Probe supervisor holding the live probe state.
    pub probe_service: Arc<ProbeService>,
    /// Saved address and embed toggle.
    pub settings: Arc<SettingsStore>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Celebration timer, for manual triggers.
    pub celebration: Celebration,
    /// Fixed chat endpoint parameters.
    pub params: ChatParams,
}

impl AppState {
    /// Wires the service layer from `config` around an existing store.
    #[must_use]
    pub fn new(config: &HubConfig, settings: SettingsStore) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let celebration = Celebration::new(config.celebration_duration(), event_bus.clone());
        let params = ChatParams::DEFAULT;
        let probe_service = Arc::new(ProbeService::new(
            Prober::new(config.probe_timeout()),
            params,
            event_bus.clone(),
            celebration.clone(),
        ));
        Self {
            probe_service,
            settings: Arc::new(settings),
            event_bus,
            celebration,
            params,
        }
    }
}
