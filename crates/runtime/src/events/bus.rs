//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use super::types::ControlEvent;
use crate::system::TrackingEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Per-device reading and target changes
    Tracking,
    /// World edits, device attachment and tick boundaries
    Control,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Tracking(TrackingEvent),
    Control(ControlEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Tracking(_) => Topic::Tracking,
            Event::Control(_) => Topic::Control,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort: events sent while a
/// topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    tracking: broadcast::Sender<Event>,
    control: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tracking: broadcast::channel(capacity).0,
            control: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Tracking => &self.tracking,
            Topic::Control => &self.control,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::DeviceId;

    #[tokio::test]
    async fn events_are_routed_by_topic() {
        let bus = EventBus::with_capacity(8);
        let mut tracking = bus.subscribe(Topic::Tracking);
        let mut control = bus.subscribe(Topic::Control);

        bus.publish(Event::Control(ControlEvent::TickCompleted { tick: 1 }));
        bus.publish(Event::Tracking(TrackingEvent::Activated {
            device: DeviceId(0),
        }));

        assert_eq!(
            control.recv().await.unwrap(),
            Event::Control(ControlEvent::TickCompleted { tick: 1 })
        );
        assert_eq!(
            tracking.recv().await.unwrap(),
            Event::Tracking(TrackingEvent::Activated {
                device: DeviceId(0)
            })
        );
        assert!(tracking.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(Event::Control(ControlEvent::TickCompleted { tick: 7 }));
        let receivers = bus.subscribe_multiple(&[Topic::Tracking, Topic::Control]);
        assert_eq!(receivers.len(), 2);
    }
}
