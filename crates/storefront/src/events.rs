//! Store change notifications.
//!
//! Every successful store write publishes exactly one [`StoreEvent`] so that
//! other surfaces (the header cart badge, the favorites counter) can refresh.
//! Failed operations publish nothing.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// A change to one of the persisted stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The cart was written.
    CartChanged {
        /// Total items in the cart after the write.
        item_count: u32,
    },
    /// The favorites list was written.
    FavoritesChanged {
        /// Number of favorites after the write.
        count: usize,
    },
    /// An order was placed or updated.
    OrdersChanged,
    /// The user signed in, out, or edited their profile.
    SessionChanged {
        /// Whether a session exists after the change.
        signed_in: bool,
    },
}

/// Broadcast channel for [`StoreEvent`]s.
///
/// Cheap to clone; all clones publish to the same subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to current subscribers.
    pub fn publish(&self, event: StoreEvent) {
        tracing::debug!(?event, "Publishing store event");
        // No subscribers is fine; nobody is displaying the store
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        EventBus::new().publish(StoreEvent::OrdersChanged);
    }

    #[test]
    fn test_subscribers_receive_events_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(StoreEvent::CartChanged { item_count: 2 });
        bus.clone().publish(StoreEvent::OrdersChanged);

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartChanged { item_count: 2 });
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::OrdersChanged);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }
}
