//! Type-safe probe attempt identifier.
//!
//! [`AttemptId`] is a newtype wrapper around [`uuid::Uuid`] (v4) so that
//! probe attempts cannot be confused with other UUIDs flowing through the
//! hub.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for one probe attempt.
///
/// Generated when a probe starts and carried by every snapshot and event
/// that attempt produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(uuid::Uuid);

impl AttemptId {
    /// Creates a new random `AttemptId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AttemptId> for uuid::Uuid {
    fn from(id: AttemptId) -> Self {
        id.0
    }
}
