//! Property service: guarantees a property record exists before values are
//! recorded against it.

use propstate_domain::error::{NotFoundError, PropStateError, PropertyTypeMismatch};
use propstate_domain::event::{Event, PropertyLifecycleEvent};
use propstate_domain::id::DevicePropertyId;
use propstate_domain::property::{DeviceProperty, DevicePropertyType};
use propstate_domain::time::now;

use crate::keyed_lock::KeyedLocks;
use crate::ports::{EventPublisher, PropertyRepository};

/// Application service owning the property registry.
///
/// Lookups and creation for the same property id are serialised, so a
/// property is created (and announced) at most once.
pub struct PropertyService<R, P> {
    repo: R,
    publisher: P,
    locks: KeyedLocks<DevicePropertyId>,
}

impl<R: PropertyRepository, P: EventPublisher> PropertyService<R, P> {
    /// Create a new service backed by the given repository and publisher.
    pub fn new(repo: R, publisher: P) -> Self {
        Self {
            repo,
            publisher,
            locks: KeyedLocks::new(),
        }
    }

    /// Return the property with `id`, creating it with `property_type` on
    /// first use.
    ///
    /// Creation publishes [`Event::PropertyCreated`].
    ///
    /// # Errors
    ///
    /// Returns [`PropStateError::PropertyTypeMismatch`] when the property
    /// already exists with another type, or a storage error from the
    /// repository.
    #[tracing::instrument(skip(self), fields(property_id = %id))]
    pub async fn ensure_exists(
        &self,
        id: &DevicePropertyId,
        property_type: DevicePropertyType,
    ) -> Result<DeviceProperty, PropStateError> {
        let _guard = self.locks.lock(id.clone()).await;

        if let Some(existing) = self.repo.find_by_property_id(id).await? {
            if existing.property_type != property_type {
                return Err(PropertyTypeMismatch {
                    property_id: id.clone(),
                    stored: existing.property_type,
                    requested: property_type,
                }
                .into());
            }
            return Ok(existing);
        }

        let property = self
            .repo
            .save(DeviceProperty::new(id.clone(), property_type, now()))
            .await?;
        tracing::info!(%property_type, "property created");
        self.publish(Event::PropertyCreated(PropertyLifecycleEvent::for_property(
            &property,
        )))
        .await;
        Ok(property)
    }

    /// Look up a property by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`PropStateError::NotFound`] when no property with `id`
    /// exists, or a storage error from the repository.
    pub async fn get(&self, id: &DevicePropertyId) -> Result<DeviceProperty, PropStateError> {
        self.repo.find_by_property_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Property",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all properties of a given type.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_by_type(
        &self,
        property_type: DevicePropertyType,
    ) -> Result<Vec<DeviceProperty>, PropStateError> {
        self.repo.find_by_type(property_type).await
    }

    /// Delete a property, publishing [`Event::PropertyDeleted`] when a
    /// record was removed. Stored values are left to the value repository.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self), fields(property_id = %id))]
    pub async fn delete(&self, id: &DevicePropertyId) -> Result<bool, PropStateError> {
        let _guard = self.locks.lock(id.clone()).await;

        let Some(existing) = self.repo.find_by_property_id(id).await? else {
            return Ok(false);
        };
        let removed = self.repo.delete(id).await?;
        if removed {
            tracing::info!("property deleted");
            self.publish(Event::PropertyDeleted(PropertyLifecycleEvent::for_property(
                &existing,
            )))
            .await;
        }
        Ok(removed)
    }

    async fn publish(&self, event: Event) {
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(error = %err, "failed to publish property event");
        }
    }
}
