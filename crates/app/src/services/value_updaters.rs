//! The full set of engine instantiations, plus dispatch of dynamically-typed
//! readings to the right one.

use std::collections::HashMap;

use propstate_domain::data::DataWithTimestamp;
use propstate_domain::error::{PropStateError, ValueKindMismatch};
use propstate_domain::id::DevicePropertyId;
use propstate_domain::time::Timestamp;
use propstate_domain::value::{AlarmState, PropertyValue, RollerState, ValueKind, ValueKindTag};
use propstate_domain::value_type::DevicePropertyValueType;

use crate::ports::{EventPublisher, PropertyRepository, ValueRepository};
use crate::services::value_update_service::{
    ValueUpdateConfig, ValueUpdateContext, ValueUpdateService,
};

/// A value reported by a device adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub property_id: DevicePropertyId,
    pub value_type: DevicePropertyValueType,
    pub value: PropertyValue,
    pub timestamp: Timestamp,
    pub display_name: String,
}

type Engines<T, PR, VR, P> = HashMap<DevicePropertyValueType, ValueUpdateService<T, PR, VR, P>>;

/// One engine per registry entry, all sharing the same repositories,
/// publisher, property service and lock table.
pub struct ValueUpdaters<PR, VR, P> {
    booleans: Engines<bool, PR, VR, P>,
    integers: Engines<i64, PR, VR, P>,
    floats: Engines<f32, PR, VR, P>,
    doubles: Engines<f64, PR, VR, P>,
    roller_states: Engines<RollerState, PR, VR, P>,
    alarm_states: Engines<AlarmState, PR, VR, P>,
}

fn insert<T, PR, VR, P>(
    engines: &mut Engines<T, PR, VR, P>,
    value_type: DevicePropertyValueType,
    ctx: &ValueUpdateContext<PR, VR, P>,
) where
    T: ValueKind,
    PR: PropertyRepository,
    VR: ValueRepository + Clone,
    P: EventPublisher + Clone,
{
    let engine = ValueUpdateService::new(ValueUpdateConfig::unchecked(value_type), ctx.clone());
    engines.insert(value_type, engine);
}

async fn dispatch<T, PR, VR, P>(
    engines: &Engines<T, PR, VR, P>,
    value: T,
    reading: &Reading,
) -> Result<(), PropStateError>
where
    T: ValueKind,
    PR: PropertyRepository,
    VR: ValueRepository,
    P: EventPublisher,
{
    let engine = engines.get(&reading.value_type).ok_or(ValueKindMismatch {
        expected: reading.value_type.kind(),
        actual: T::TAG,
    })?;
    engine
        .record_value(value, reading.timestamp, &reading.property_id, &reading.display_name)
        .await
}

async fn read<T, PR, VR, P>(
    engines: &Engines<T, PR, VR, P>,
    property_id: &DevicePropertyId,
    value_type: DevicePropertyValueType,
) -> Result<Option<DataWithTimestamp<PropertyValue>>, PropStateError>
where
    T: ValueKind,
    PR: PropertyRepository,
    VR: ValueRepository,
    P: EventPublisher,
{
    match engines.get(&value_type) {
        Some(engine) => Ok(engine
            .current_value(property_id)
            .await?
            .map(DataWithTimestamp::into_stored)),
        None => Ok(None),
    }
}

impl<PR, VR, P> ValueUpdaters<PR, VR, P>
where
    PR: PropertyRepository,
    VR: ValueRepository + Clone,
    P: EventPublisher + Clone,
{
    /// Build an engine for every entry of [`DevicePropertyValueType::ALL`].
    pub fn new(ctx: &ValueUpdateContext<PR, VR, P>) -> Self {
        let mut this = Self {
            booleans: HashMap::new(),
            integers: HashMap::new(),
            floats: HashMap::new(),
            doubles: HashMap::new(),
            roller_states: HashMap::new(),
            alarm_states: HashMap::new(),
        };
        for &value_type in DevicePropertyValueType::ALL {
            match value_type.kind() {
                ValueKindTag::Boolean => insert(&mut this.booleans, value_type, ctx),
                ValueKindTag::Integer => insert(&mut this.integers, value_type, ctx),
                ValueKindTag::Float => insert(&mut this.floats, value_type, ctx),
                ValueKindTag::Double => insert(&mut this.doubles, value_type, ctx),
                ValueKindTag::RollerState => insert(&mut this.roller_states, value_type, ctx),
                ValueKindTag::AlarmState => insert(&mut this.alarm_states, value_type, ctx),
            }
        }
        this
    }
}

impl<PR, VR, P> ValueUpdaters<PR, VR, P>
where
    PR: PropertyRepository,
    VR: ValueRepository,
    P: EventPublisher,
{
    /// Record a reading through the engine for its value type.
    ///
    /// # Errors
    ///
    /// Returns [`PropStateError::ValueKindMismatch`] when the reading's value
    /// is not of the kind its value type carries, otherwise whatever
    /// [`ValueUpdateService::record_value`] returns.
    pub async fn record(&self, reading: &Reading) -> Result<(), PropStateError> {
        match reading.value {
            PropertyValue::Boolean(v) => dispatch(&self.booleans, v, reading).await,
            PropertyValue::Integer(v) => dispatch(&self.integers, v, reading).await,
            PropertyValue::Float(v) => dispatch(&self.floats, v, reading).await,
            PropertyValue::Double(v) => dispatch(&self.doubles, v, reading).await,
            PropertyValue::RollerState(v) => dispatch(&self.roller_states, v, reading).await,
            PropertyValue::AlarmState(v) => dispatch(&self.alarm_states, v, reading).await,
        }
    }

    /// Latest stored value for a `(property, value type)` pair.
    ///
    /// # Errors
    ///
    /// Returns the repository error, or a kind mismatch for corrupt data.
    pub async fn current_value(
        &self,
        property_id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
    ) -> Result<Option<DataWithTimestamp<PropertyValue>>, PropStateError> {
        match value_type.kind() {
            ValueKindTag::Boolean => read(&self.booleans, property_id, value_type).await,
            ValueKindTag::Integer => read(&self.integers, property_id, value_type).await,
            ValueKindTag::Float => read(&self.floats, property_id, value_type).await,
            ValueKindTag::Double => read(&self.doubles, property_id, value_type).await,
            ValueKindTag::RollerState => read(&self.roller_states, property_id, value_type).await,
            ValueKindTag::AlarmState => read(&self.alarm_states, property_id, value_type).await,
        }
    }

    /// Number of engine instantiations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.booleans.len()
            + self.integers.len()
            + self.floats.len()
            + self.doubles.len()
            + self.roller_states.len()
            + self.alarm_states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
