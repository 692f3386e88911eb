//! Virtual thermometer, drifts slowly around a base temperature.

use propstate_app::services::value_updaters::Reading;
use propstate_domain::error::PropStateError;
use propstate_domain::id::DevicePropertyId;
use propstate_domain::time::Timestamp;
use propstate_domain::value::PropertyValue;
use propstate_domain::value_type::DevicePropertyValueType;

use super::virtual_property;

/// Offsets (tenths of a degree) applied in turn. Zeros produce repeated
/// readings.
const DRIFT: [i16; 8] = [0, 1, 1, 0, 0, -1, -1, 0];

/// A simulated temperature sensor.
pub struct VirtualThermometer {
    property_id: DevicePropertyId,
    tenths: i16,
    step: usize,
}

impl VirtualThermometer {
    /// # Errors
    ///
    /// Returns a validation error if `id` is blank.
    pub fn new(id: &str, celsius: f32) -> Result<Self, PropStateError> {
        #[allow(clippy::cast_possible_truncation)]
        let tenths = (celsius * 10.0).round() as i16;
        Ok(Self {
            property_id: virtual_property(id)?,
            tenths,
            step: 0,
        })
    }

    #[must_use]
    pub fn property_id(&self) -> &DevicePropertyId {
        &self.property_id
    }

    /// Current temperature in °C.
    #[must_use]
    pub fn celsius(&self) -> f32 {
        f32::from(self.tenths) / 10.0
    }

    pub fn tick(&mut self, at: Timestamp) -> Vec<Reading> {
        self.tenths = self.tenths.saturating_add(DRIFT[self.step % DRIFT.len()]);
        self.step = self.step.wrapping_add(1);

        vec![Reading {
            property_id: self.property_id.clone(),
            value_type: DevicePropertyValueType::Temperature,
            value: PropertyValue::Float(self.celsius()),
            timestamp: at,
            display_name: "Virtual Thermometer".to_string(),
        }]
    }
}
