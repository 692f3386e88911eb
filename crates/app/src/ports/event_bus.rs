//! Event bus port: publish/subscribe for domain events.

use std::future::Future;

use propstate_domain::error::PropStateError;
use propstate_domain::event::Event;

/// Publishes domain events to interested subscribers.
///
/// Publishing is fire-and-forget from the pipeline's point of view: callers
/// log failures and carry on.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PropStateError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PropStateError>> + Send {
        (**self).publish(event)
    }
}
