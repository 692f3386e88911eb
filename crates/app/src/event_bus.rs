//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use propstate_domain::error::PropStateError;
use propstate_domain::event::Event;

use crate::ports::EventPublisher;

/// Process-wide fan-out point for [`Event`]s, using a tokio [`broadcast`]
/// channel.
///
/// Publishing never blocks and succeeds even when there are no active
/// subscribers (the event is simply dropped). Each subscriber sees events in
/// publication order; a subscriber that falls more than `capacity` events
/// behind loses the oldest ones.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PropStateError>> + Send {
        // send only fails when there are zero receivers
        if self.sender.send(event).is_err() {
            tracing::trace!("event dropped, no subscribers");
        }
        async { Ok(()) }
    }
}
