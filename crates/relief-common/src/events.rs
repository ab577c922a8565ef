use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A new token was acquired and a profile lookup was issued for it.
    TokenAcquired,
    ProfileResolved { email: String },
    /// The token was rejected while resolving the profile.
    SessionExpired { reason: String },
    LoggedOut,
    AnswerReceived { snippets: usize },
    QueryFailed { message: String },
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::TokenAcquired);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::TokenAcquired));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Event::LoggedOut);

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert!(matches!(e1, Event::LoggedOut));
        assert!(matches!(e2, Event::LoggedOut));
    }

    #[tokio::test]
    async fn session_events_keep_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::TokenAcquired);
        bus.publish(Event::ProfileResolved {
            email: "teen@example.com".into(),
        });
        bus.publish(Event::SessionExpired {
            reason: "HTTP 401".into(),
        });

        assert!(matches!(rx.recv().await.unwrap(), Event::TokenAcquired));
        let e2 = rx.recv().await.unwrap();
        assert!(matches!(e2, Event::ProfileResolved { ref email } if email == "teen@example.com"));
        let e3 = rx.recv().await.unwrap();
        assert!(matches!(e3, Event::SessionExpired { ref reason } if reason == "HTTP 401"));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        let count = bus.publish(Event::Shutdown);
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn publish_returns_subscriber_count() {
        let bus = EventBus::new(16);
        let _rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();

        let count = bus.publish(Event::AnswerReceived { snippets: 3 });
        assert_eq!(count, 2);
    }

    #[test]
    fn unknown_event_deserializes() {
        let json = r#"{"type":"SomeNewEventWeNeverHeardOf","data":null}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(matches!(event, Event::Unknown));
    }
}
