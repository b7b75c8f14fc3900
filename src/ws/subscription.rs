//! Per-connection subscription manager.
//!
//! Tracks which event topics a WebSocket client receives and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::EventTopic;

/// Manages the set of topic subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    topics: HashSet<EventTopic>,
}

impl SubscriptionManager {
    /// Creates a manager subscribed to nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager subscribed to every topic.
    #[must_use]
    pub fn all() -> Self {
        Self {
            topics: EventTopic::ALL.into_iter().collect(),
        }
    }

    /// Adds topics to the subscription set.
    pub fn subscribe(&mut self, topics: &[EventTopic]) {
        self.topics.extend(topics.iter().copied());
    }

    /// Removes topics from the subscription set.
    pub fn unsubscribe(&mut self, topics: &[EventTopic]) {
        for topic in topics {
            self.topics.remove(topic);
        }
    }

    /// Returns `true` if events of `topic` should be forwarded.
    #[must_use]
    pub fn matches(&self, topic: EventTopic) -> bool {
        self.topics.contains(&topic)
    }

    /// Returns the subscribed topics in declaration order.
    #[must_use]
    pub fn topics(&self) -> Vec<EventTopic> {
        EventTopic::ALL
            .into_iter()
            .filter(|topic| self.topics.contains(topic))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(EventTopic::Probe));
    }

    #[test]
    fn all_matches_every_topic() {
        let mgr = SubscriptionManager::all();
        for topic in EventTopic::ALL {
            assert!(mgr.matches(topic));
        }
    }

    #[test]
    fn unsubscribe_removes_topic() {
        let mut mgr = SubscriptionManager::all();
        mgr.unsubscribe(&[EventTopic::Celebration]);
        assert!(!mgr.matches(EventTopic::Celebration));
        assert_eq!(mgr.topics(), [EventTopic::Probe, EventTopic::Settings]);
    }

    #[test]
    fn subscribe_is_idempotent() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[EventTopic::Probe, EventTopic::Probe]);
        assert_eq!(mgr.topics(), [EventTopic::Probe]);
    }
}
