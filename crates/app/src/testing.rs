//! In-memory fakes for the port traits, shared by the service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use propstate_domain::data::DataWithTimestamp;
use propstate_domain::error::PropStateError;
use propstate_domain::event::Event;
use propstate_domain::id::{DeviceId, DevicePropertyId};
use propstate_domain::property::{DeviceProperty, DevicePropertyType};
use propstate_domain::value::PropertyValue;
use propstate_domain::value_type::DevicePropertyValueType;

use crate::ports::{EventPublisher, PropertyRepository, ValueRepository};

pub fn property_id(device: &str, slot: u32) -> DevicePropertyId {
    DevicePropertyId::new(DeviceId::new(device, "shelly1").unwrap(), slot)
}

fn injected() -> PropStateError {
    PropStateError::Storage(Box::new(std::io::Error::other("injected failure")))
}

#[derive(Default)]
pub struct InMemoryPropertyRepo {
    pub store: Mutex<HashMap<DevicePropertyId, DeviceProperty>>,
}

impl PropertyRepository for InMemoryPropertyRepo {
    fn find_by_property_id(
        &self,
        id: &DevicePropertyId,
    ) -> impl Future<Output = Result<Option<DeviceProperty>, PropStateError>> + Send {
        let result = self.store.lock().unwrap().get(id).cloned();
        async move {
            // give racing tasks a chance to interleave
            tokio::task::yield_now().await;
            Ok(result)
        }
    }

    fn save(
        &self,
        property: DeviceProperty,
    ) -> impl Future<Output = Result<DeviceProperty, PropStateError>> + Send {
        self.store
            .lock()
            .unwrap()
            .insert(property.id.clone(), property.clone());
        async { Ok(property) }
    }

    fn delete(
        &self,
        id: &DevicePropertyId,
    ) -> impl Future<Output = Result<bool, PropStateError>> + Send {
        let removed = self.store.lock().unwrap().remove(id).is_some();
        async move { Ok(removed) }
    }

    fn find_by_type(
        &self,
        property_type: DevicePropertyType,
    ) -> impl Future<Output = Result<Vec<DeviceProperty>, PropStateError>> + Send {
        let result: Vec<DeviceProperty> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.property_type == property_type)
            .cloned()
            .collect();
        async { Ok(result) }
    }
}

type ValueKey = (DevicePropertyId, DevicePropertyValueType);

/// Value repository whose reads and writes yield, so that unserialised
/// callers would interleave between read and write.
#[derive(Default)]
pub struct InMemoryValueRepo {
    pub store: Mutex<HashMap<ValueKey, DataWithTimestamp<PropertyValue>>>,
    pub fail_inserts: AtomicBool,
}

impl InMemoryValueRepo {
    pub fn latest(
        &self,
        id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
    ) -> Option<DataWithTimestamp<PropertyValue>> {
        self.store
            .lock()
            .unwrap()
            .get(&(id.clone(), value_type))
            .copied()
    }
}

impl ValueRepository for InMemoryValueRepo {
    fn find_latest_value(
        &self,
        property_id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
    ) -> impl Future<Output = Result<Option<DataWithTimestamp<PropertyValue>>, PropStateError>> + Send
    {
        let key = (property_id.clone(), value_type);
        async move {
            tokio::task::yield_now().await;
            Ok(self.store.lock().unwrap().get(&key).copied())
        }
    }

    fn insert(
        &self,
        property_id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
        _display_name: &str,
        data: DataWithTimestamp<PropertyValue>,
    ) -> impl Future<Output = Result<(), PropStateError>> + Send {
        let key = (property_id.clone(), value_type);
        async move {
            tokio::task::yield_now().await;
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(injected());
            }
            self.store.lock().unwrap().insert(key, data);
            Ok(())
        }
    }
}

/// Publisher that records every event, optionally failing after recording.
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<Event>>,
    pub fail: AtomicBool,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.name() == name)
            .count()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PropStateError>> + Send {
        self.events.lock().unwrap().push(event);
        let fail = self.fail.load(Ordering::SeqCst);
        async move { if fail { Err(injected()) } else { Ok(()) } }
    }
}
