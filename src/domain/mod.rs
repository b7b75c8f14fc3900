//! Domain layer: addresses, probe state, and the event system.
//!
//! This module holds the hub's data model: the saved server address and
//! the endpoints derived from it, the fixed chat parameters, probe status
//! and snapshots, and the event bus that broadcasts state changes.

pub mod attempt_id;
pub mod chat_params;
pub mod event_bus;
pub mod hub_event;
pub mod probe_state;
pub mod server_address;

pub use attempt_id::AttemptId;
pub use chat_params::{CHAT_PARAM_COUNT, ChatParams, DEFAULT_TEXT_PROMPT, DEFAULT_VOICE};
pub use event_bus::EventBus;
pub use hub_event::{CelebrationReason, EventTopic, HubEvent};
pub use probe_state::{ProbeOutcome, ProbeSnapshot, ProbeStatus};
pub use server_address::{ServerAddress, normalize};
