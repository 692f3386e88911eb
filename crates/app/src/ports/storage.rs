//! Storage port: repository traits for property metadata and values.

use std::future::Future;
use std::sync::Arc;

use propstate_domain::data::DataWithTimestamp;
use propstate_domain::error::PropStateError;
use propstate_domain::id::DevicePropertyId;
use propstate_domain::property::{DeviceProperty, DevicePropertyType};
use propstate_domain::value::PropertyValue;
use propstate_domain::value_type::DevicePropertyValueType;

/// Repository for registered [`DeviceProperty`] records.
pub trait PropertyRepository {
    /// Get a property by its identifier.
    fn find_by_property_id(
        &self,
        id: &DevicePropertyId,
    ) -> impl Future<Output = Result<Option<DeviceProperty>, PropStateError>> + Send;

    /// Persist a property, replacing any record with the same id.
    fn save(
        &self,
        property: DeviceProperty,
    ) -> impl Future<Output = Result<DeviceProperty, PropStateError>> + Send;

    /// Delete a property. Returns whether a record was removed.
    fn delete(
        &self,
        id: &DevicePropertyId,
    ) -> impl Future<Output = Result<bool, PropStateError>> + Send;

    /// Get all properties of the given type.
    fn find_by_type(
        &self,
        property_type: DevicePropertyType,
    ) -> impl Future<Output = Result<Vec<DeviceProperty>, PropStateError>> + Send;
}

/// Repository holding the most recent value per `(property, value type)`.
pub trait ValueRepository {
    /// Get the most recently inserted value, if any.
    fn find_latest_value(
        &self,
        property_id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
    ) -> impl Future<Output = Result<Option<DataWithTimestamp<PropertyValue>>, PropStateError>> + Send;

    /// Record a new value. It becomes the latest value for the pair.
    fn insert(
        &self,
        property_id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
        display_name: &str,
        data: DataWithTimestamp<PropertyValue>,
    ) -> impl Future<Output = Result<(), PropStateError>> + Send;
}

impl<T: PropertyRepository + Send + Sync> PropertyRepository for Arc<T> {
    fn find_by_property_id(
        &self,
        id: &DevicePropertyId,
    ) -> impl Future<Output = Result<Option<DeviceProperty>, PropStateError>> + Send {
        (**self).find_by_property_id(id)
    }

    fn save(
        &self,
        property: DeviceProperty,
    ) -> impl Future<Output = Result<DeviceProperty, PropStateError>> + Send {
        (**self).save(property)
    }

    fn delete(
        &self,
        id: &DevicePropertyId,
    ) -> impl Future<Output = Result<bool, PropStateError>> + Send {
        (**self).delete(id)
    }

    fn find_by_type(
        &self,
        property_type: DevicePropertyType,
    ) -> impl Future<Output = Result<Vec<DeviceProperty>, PropStateError>> + Send {
        (**self).find_by_type(property_type)
    }
}

impl<T: ValueRepository + Send + Sync> ValueRepository for Arc<T> {
    fn find_latest_value(
        &self,
        property_id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
    ) -> impl Future<Output = Result<Option<DataWithTimestamp<PropertyValue>>, PropStateError>> + Send
    {
        (**self).find_latest_value(property_id, value_type)
    }

    fn insert(
        &self,
        property_id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
        display_name: &str,
        data: DataWithTimestamp<PropertyValue>,
    ) -> impl Future<Output = Result<(), PropStateError>> + Send {
        (**self).insert(property_id, value_type, display_name, data)
    }
}
