use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{TabId, WindowId};

/// Lifecycle events the host reports to the privileged context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostEvent {
    TabActivated { tab_id: TabId, window_id: WindowId },
    TabRemoved { tab_id: TabId, window_id: WindowId },
    WindowFocused(WindowId),
    Installed,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<HostEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: HostEvent) -> usize {
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

        bus.publish(HostEvent::Installed);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, HostEvent::Installed);
    }

    #[tokio::test]
    async fn tab_events_arrive_in_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(HostEvent::TabActivated {
            tab_id: TabId(1),
            window_id: WindowId(9),
        });
        bus.publish(HostEvent::TabRemoved {
            tab_id: TabId(1),
            window_id: WindowId(9),
        });

        assert!(matches!(
            rx.recv().await.unwrap(),
            HostEvent::TabActivated { tab_id: TabId(1), .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            HostEvent::TabRemoved { tab_id: TabId(1), .. }
        ));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(HostEvent::Installed), 0);
    }

    #[test]
    fn unknown_event_deserializes() {
        let json = r#"{"type":"BookmarkCreated","data":null}"#;
        let event: HostEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, HostEvent::Unknown);
    }
}
