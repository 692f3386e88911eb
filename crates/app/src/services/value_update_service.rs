//! Value-update engine: records an observed value and decides which events
//! to raise for it.
//!
//! For every call the engine:
//! 1. makes sure the property exists (creating it on first use),
//! 2. reads the previously stored value,
//! 3. stores the new value,
//! 4. publishes an *updated* event,
//! 5. publishes a *changed* event when there was no previous value or the
//!    value differs from it.
//!
//! Steps 2–5 run under a lock keyed by `(property, value type)`, so two
//! racing writers never observe the same previous value and events for one
//! key are published in the order the writes were serialised. Different
//! keys proceed independently.

use std::marker::PhantomData;
use std::sync::Arc;

use propstate_domain::data::DataWithTimestamp;
use propstate_domain::error::{PropStateError, ValueKindMismatch};
use propstate_domain::event::{Event, EventFactory, changed_event, updated_event};
use propstate_domain::id::DevicePropertyId;
use propstate_domain::property::DevicePropertyType;
use propstate_domain::time::Timestamp;
use propstate_domain::value::ValueKind;
use propstate_domain::value_type::DevicePropertyValueType;

use crate::keyed_lock::KeyedLocks;
use crate::ports::{EventPublisher, PropertyRepository, ValueRepository};
use crate::services::property_service::PropertyService;

/// Lock key for the read-compare-write section.
pub type ValueKey = (DevicePropertyId, DevicePropertyValueType);

/// Configuration of one engine instantiation.
pub struct ValueUpdateConfig<T> {
    pub property_type: DevicePropertyType,
    pub value_type: DevicePropertyValueType,
    pub make_updated: EventFactory<T>,
    pub make_changed: EventFactory<T>,
}

impl<T> Clone for ValueUpdateConfig<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ValueUpdateConfig<T> {}

impl<T: ValueKind> ValueUpdateConfig<T> {
    /// Configuration for `value_type` with the default event constructors.
    ///
    /// # Errors
    ///
    /// Returns [`ValueKindMismatch`] when `value_type` is not backed by `T`.
    pub fn try_new(value_type: DevicePropertyValueType) -> Result<Self, ValueKindMismatch> {
        if value_type.kind() != T::TAG {
            return Err(ValueKindMismatch {
                expected: value_type.kind(),
                actual: T::TAG,
            });
        }
        Ok(Self::unchecked(value_type))
    }

    /// Caller guarantees `value_type.kind() == T::TAG`.
    pub(crate) fn unchecked(value_type: DevicePropertyValueType) -> Self {
        Self {
            property_type: value_type.property_type(),
            value_type,
            make_updated: updated_event::<T>,
            make_changed: changed_event::<T>,
        }
    }

    /// Replace the event constructors.
    #[must_use]
    pub fn with_factories(
        mut self,
        make_updated: EventFactory<T>,
        make_changed: EventFactory<T>,
    ) -> Self {
        self.make_updated = make_updated;
        self.make_changed = make_changed;
        self
    }
}

/// Collaborators shared by every engine instantiation.
pub struct ValueUpdateContext<PR, VR, P> {
    pub properties: Arc<PropertyService<PR, P>>,
    pub values: VR,
    pub publisher: P,
    pub locks: Arc<KeyedLocks<ValueKey>>,
}

impl<PR, VR: Clone, P: Clone> Clone for ValueUpdateContext<PR, VR, P> {
    fn clone(&self) -> Self {
        Self {
            properties: Arc::clone(&self.properties),
            values: self.values.clone(),
            publisher: self.publisher.clone(),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<PR, VR, P> ValueUpdateContext<PR, VR, P>
where
    PR: PropertyRepository,
    P: EventPublisher + Clone,
{
    /// Wire a context around fresh property service and lock table.
    pub fn new(property_repo: PR, values: VR, publisher: P) -> Self {
        Self {
            properties: Arc::new(PropertyService::new(property_repo, publisher.clone())),
            values,
            publisher,
            locks: Arc::new(KeyedLocks::new()),
        }
    }
}

/// Generic value-update engine for value kind `T`.
pub struct ValueUpdateService<T, PR, VR, P> {
    config: ValueUpdateConfig<T>,
    ctx: ValueUpdateContext<PR, VR, P>,
    _kind: PhantomData<fn(T)>,
}

impl<T, PR, VR, P> ValueUpdateService<T, PR, VR, P>
where
    T: ValueKind,
    PR: PropertyRepository,
    VR: ValueRepository,
    P: EventPublisher,
{
    pub fn new(config: ValueUpdateConfig<T>, ctx: ValueUpdateContext<PR, VR, P>) -> Self {
        Self {
            config,
            ctx,
            _kind: PhantomData,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ValueUpdateConfig<T> {
        &self.config
    }

    /// Record an observed value for a property.
    ///
    /// An updated event is always published; a changed event is published
    /// when the property had no value yet or the value differs (exact
    /// comparison, timestamps ignored). The value is stored before anything
    /// is published, and publish failures are logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the property or value cannot be
    /// read or stored (nothing is published in that case), or
    /// [`PropStateError::PropertyTypeMismatch`] from the existence check.
    #[tracing::instrument(
        skip(self, value, timestamp, display_name),
        fields(property_id = %property_id, value_type = %self.config.value_type)
    )]
    pub async fn record_value(
        &self,
        value: T,
        timestamp: Timestamp,
        property_id: &DevicePropertyId,
        display_name: &str,
    ) -> Result<(), PropStateError> {
        let value_type = self.config.value_type;
        self.ctx
            .properties
            .ensure_exists(property_id, self.config.property_type)
            .await?;

        let _guard = self.ctx.locks.lock((property_id.clone(), value_type)).await;

        let previous = self.load_previous(property_id).await?;
        let current = DataWithTimestamp::new(value, timestamp);
        self.ctx
            .values
            .insert(property_id, value_type, display_name, current.into_stored())
            .await?;

        let updated =
            (self.config.make_updated)(property_id, value_type, current, previous, display_name);
        self.publish(updated).await;

        let changed = previous.is_none_or(|prev| !prev.same_value(&current));
        if changed {
            tracing::debug!(?value, "value changed");
            let event = (self.config.make_changed)(
                property_id,
                value_type,
                current,
                previous,
                display_name,
            );
            self.publish(event).await;
        }
        Ok(())
    }

    /// Read the latest stored value without taking the write lock.
    ///
    /// # Errors
    ///
    /// Returns the repository error, or [`PropStateError::ValueKindMismatch`]
    /// when the stored value is of another kind.
    pub async fn current_value(
        &self,
        property_id: &DevicePropertyId,
    ) -> Result<Option<DataWithTimestamp<T>>, PropStateError> {
        let stored = self
            .ctx
            .values
            .find_latest_value(property_id, self.config.value_type)
            .await?;
        Ok(stored
            .map(DataWithTimestamp::try_into_typed::<T>)
            .transpose()?)
    }

    /// A stored value of the wrong kind cannot be compared; it is treated
    /// as absent so that the new value counts as a change.
    async fn load_previous(
        &self,
        property_id: &DevicePropertyId,
    ) -> Result<Option<DataWithTimestamp<T>>, PropStateError> {
        let stored = self
            .ctx
            .values
            .find_latest_value(property_id, self.config.value_type)
            .await?;
        match stored.map(DataWithTimestamp::try_into_typed::<T>).transpose() {
            Ok(previous) => Ok(previous),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring stored value of unexpected kind");
                Ok(None)
            }
        }
    }

    async fn publish(&self, event: Event) {
        let name = event.name();
        if let Err(err) = self.ctx.publisher.publish(event).await {
            tracing::warn!(error = %err, event = name, "failed to publish value event");
        }
    }
}
