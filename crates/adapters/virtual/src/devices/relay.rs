//! Virtual relay, flips its output every few ticks.

use propstate_app::services::value_updaters::Reading;
use propstate_domain::error::PropStateError;
use propstate_domain::id::DevicePropertyId;
use propstate_domain::time::Timestamp;
use propstate_domain::value::PropertyValue;
use propstate_domain::value_type::DevicePropertyValueType;

use super::virtual_property;

/// A simulated relay.
///
/// It reports its state on every tick, so most readings repeat the previous
/// value and only the toggles count as changes.
pub struct VirtualRelay {
    property_id: DevicePropertyId,
    on: bool,
    toggle_every: u32,
    ticks: u32,
}

impl VirtualRelay {
    /// Create a relay that starts off and toggles every `toggle_every` ticks.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `id` is blank.
    pub fn new(id: &str, toggle_every: u32) -> Result<Self, PropStateError> {
        Ok(Self {
            property_id: virtual_property(id)?,
            on: false,
            toggle_every: toggle_every.max(1),
            ticks: 0,
        })
    }

    #[must_use]
    pub fn property_id(&self) -> &DevicePropertyId {
        &self.property_id
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn tick(&mut self, at: Timestamp) -> Vec<Reading> {
        if self.ticks > 0 && self.ticks % self.toggle_every == 0 {
            self.on = !self.on;
        }
        self.ticks = self.ticks.wrapping_add(1);

        vec![Reading {
            property_id: self.property_id.clone(),
            value_type: DevicePropertyValueType::RelayState,
            value: PropertyValue::Boolean(self.on),
            timestamp: at,
            display_name: "Virtual Relay".to_string(),
        }]
    }
}
