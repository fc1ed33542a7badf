//! Topic-based event bus implementation.

use tokio::sync::broadcast;

use super::types::{RoundsEvent, SessionEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Session state changes
    Session,
    /// Round prefetch outcomes
    Rounds,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone)]
pub enum Event {
    Session(SessionEvent),
    Rounds(RoundsEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session(_) => Topic::Session,
            Event::Rounds(_) => Topic::Rounds,
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about. Publishing never blocks
/// and never fails; events sent while nobody listens are dropped.
#[derive(Clone)]
pub struct EventBus {
    session: broadcast::Sender<Event>,
    rounds: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            session: broadcast::channel(capacity).0,
            rounds: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Session => &self.session,
            Topic::Rounds => &self.rounds,
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
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::new();
        let mut rounds = bus.subscribe(Topic::Rounds);
        let mut session = bus.subscribe(Topic::Session);

        bus.publish(Event::Rounds(RoundsEvent::Discarded { epoch: 4 }));

        match rounds.recv().await.unwrap() {
            Event::Rounds(RoundsEvent::Discarded { epoch }) => assert_eq!(epoch, 4),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(session.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(0);
        bus.publish(Event::Rounds(RoundsEvent::Fetched { epoch: 0, count: 1 }));
    }
}
