//! Events: immutable records of property lifecycle and observed values.
//!
//! Every observation produces a [`Event::ValueUpdated`]; only a transition
//! (or a first observation) produces a [`Event::ValueChanged`].

use serde::{Deserialize, Serialize};

use crate::data::DataWithTimestamp;
use crate::id::{DevicePropertyId, EventId};
use crate::message::{message_args, message_key};
use crate::property::{DeviceProperty, DevicePropertyType};
use crate::time::{Timestamp, now};
use crate::value::{PropertyValue, ValueKind};
use crate::value_type::DevicePropertyValueType;

/// The two shapes of property-value event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueEventKind {
    Updated,
    Changed,
}

impl ValueEventKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Changed => "changed",
        }
    }

    /// Build the event of this kind.
    #[must_use]
    pub fn build(
        self,
        property_id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
        current: DataWithTimestamp<PropertyValue>,
        previous: Option<DataWithTimestamp<PropertyValue>>,
        display_name: &str,
    ) -> Event {
        let payload = PropertyValueEvent {
            id: EventId::new(),
            property_id: property_id.clone(),
            value_type,
            display_name: display_name.to_string(),
            message_key: message_key(value_type, self, &current.value).to_string(),
            message_args: message_args(value_type, display_name, &current.value),
            current,
            previous,
        };
        match self {
            Self::Updated => Event::ValueUpdated(payload),
            Self::Changed => Event::ValueChanged(payload),
        }
    }
}

/// Payload shared by updated and changed events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValueEvent {
    pub id: EventId,
    pub property_id: DevicePropertyId,
    pub value_type: DevicePropertyValueType,
    pub display_name: String,
    pub current: DataWithTimestamp<PropertyValue>,
    pub previous: Option<DataWithTimestamp<PropertyValue>>,
    pub message_key: String,
    pub message_args: Vec<String>,
}

impl PropertyValueEvent {
    /// Whether this is the first value ever observed for the property.
    #[must_use]
    pub fn is_first_observation(&self) -> bool {
        self.previous.is_none()
    }
}

/// Payload for property creation and deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyLifecycleEvent {
    pub id: EventId,
    pub property_id: DevicePropertyId,
    pub property_type: DevicePropertyType,
    pub timestamp: Timestamp,
}

impl PropertyLifecycleEvent {
    #[must_use]
    pub fn for_property(property: &DeviceProperty) -> Self {
        Self {
            id: EventId::new(),
            property_id: property.id.clone(),
            property_type: property.property_type,
            timestamp: now(),
        }
    }
}

/// Everything published on the event sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    PropertyCreated(PropertyLifecycleEvent),
    PropertyDeleted(PropertyLifecycleEvent),
    ValueUpdated(PropertyValueEvent),
    ValueChanged(PropertyValueEvent),
}

impl Event {
    #[must_use]
    pub fn id(&self) -> EventId {
        match self {
            Self::PropertyCreated(e) | Self::PropertyDeleted(e) => e.id,
            Self::ValueUpdated(e) | Self::ValueChanged(e) => e.id,
        }
    }

    #[must_use]
    pub fn property_id(&self) -> &DevicePropertyId {
        match self {
            Self::PropertyCreated(e) | Self::PropertyDeleted(e) => &e.property_id,
            Self::ValueUpdated(e) | Self::ValueChanged(e) => &e.property_id,
        }
    }

    /// The value payload, for updated and changed events.
    #[must_use]
    pub fn value_event(&self) -> Option<&PropertyValueEvent> {
        match self {
            Self::ValueUpdated(e) | Self::ValueChanged(e) => Some(e),
            Self::PropertyCreated(_) | Self::PropertyDeleted(_) => None,
        }
    }

    #[must_use]
    pub fn value_event_kind(&self) -> Option<ValueEventKind> {
        match self {
            Self::ValueUpdated(_) => Some(ValueEventKind::Updated),
            Self::ValueChanged(_) => Some(ValueEventKind::Changed),
            Self::PropertyCreated(_) | Self::PropertyDeleted(_) => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PropertyCreated(_) => "property_created",
            Self::PropertyDeleted(_) => "property_deleted",
            Self::ValueUpdated(_) => "value_updated",
            Self::ValueChanged(_) => "value_changed",
        }
    }
}

/// Signature shared by the typed event constructors.
pub type EventFactory<T> = fn(
    &DevicePropertyId,
    DevicePropertyValueType,
    DataWithTimestamp<T>,
    Option<DataWithTimestamp<T>>,
    &str,
) -> Event;

/// Default constructor for updated events.
#[must_use]
pub fn updated_event<T: ValueKind>(
    property_id: &DevicePropertyId,
    value_type: DevicePropertyValueType,
    current: DataWithTimestamp<T>,
    previous: Option<DataWithTimestamp<T>>,
    display_name: &str,
) -> Event {
    ValueEventKind::Updated.build(
        property_id,
        value_type,
        current.into_stored(),
        previous.map(DataWithTimestamp::into_stored),
        display_name,
    )
}

/// Default constructor for changed events.
#[must_use]
pub fn changed_event<T: ValueKind>(
    property_id: &DevicePropertyId,
    value_type: DevicePropertyValueType,
    current: DataWithTimestamp<T>,
    previous: Option<DataWithTimestamp<T>>,
    display_name: &str,
) -> Event {
    ValueEventKind::Changed.build(
        property_id,
        value_type,
        current.into_stored(),
        previous.map(DataWithTimestamp::into_stored),
        display_name,
    )
}
