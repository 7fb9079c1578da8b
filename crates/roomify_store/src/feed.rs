//! In-process fan-out of booking row changes.

use roomify_common::models::BookingChange;
use tokio::sync::broadcast;
use tracing::trace;

/// Buffered changes per subscriber before the slowest one starts lagging.
pub const DEFAULT_FEED_CAPACITY: usize = 64;

/// Broadcasts every booking change to all current subscribers.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<BookingChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change. Returns how many subscribers will see it.
    pub fn publish(&self, change: BookingChange) -> usize {
        // no subscribers is fine: nobody is watching the calendar
        let delivered = self.sender.send(change).unwrap_or(0);
        trace!("Booking change delivered to {} subscriber(s)", delivered);
        delivered
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingChange> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}
