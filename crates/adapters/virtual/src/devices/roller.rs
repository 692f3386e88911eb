//! Virtual roller shutter, travels between fully open and fully closed.

use propstate_app::services::value_updaters::Reading;
use propstate_domain::error::PropStateError;
use propstate_domain::id::DevicePropertyId;
use propstate_domain::time::Timestamp;
use propstate_domain::value::{PropertyValue, RollerState};
use propstate_domain::value_type::DevicePropertyValueType;

use super::virtual_property;

const OPEN: i64 = 100;
const CLOSED: i64 = 0;

/// A simulated roller shutter.
///
/// Moves `step` percent per tick towards its target, pauses one tick when it
/// gets there, then heads back the other way.
pub struct VirtualRoller {
    property_id: DevicePropertyId,
    position: i64,
    target: i64,
    step: i64,
    state: RollerState,
}

impl VirtualRoller {
    /// Create a closed roller that starts opening on the first tick.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `id` is blank.
    pub fn new(id: &str, step: u8) -> Result<Self, PropStateError> {
        Ok(Self {
            property_id: virtual_property(id)?,
            position: CLOSED,
            target: OPEN,
            step: i64::from(step.max(1)),
            state: RollerState::Idle,
        })
    }

    #[must_use]
    pub fn property_id(&self) -> &DevicePropertyId {
        &self.property_id
    }

    #[must_use]
    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn tick(&mut self, at: Timestamp) -> Vec<Reading> {
        if self.position == self.target {
            if self.state == RollerState::Idle {
                self.target = if self.target == OPEN { CLOSED } else { OPEN };
            } else {
                self.state = RollerState::Idle;
            }
        }
        if self.position < self.target {
            self.state = RollerState::Opening;
            self.position = (self.position + self.step).min(self.target);
        } else if self.position > self.target {
            self.state = RollerState::Closing;
            self.position = (self.position - self.step).max(self.target);
        }

        vec![
            self.reading(
                DevicePropertyValueType::RollerPosition,
                PropertyValue::Integer(self.position),
                at,
            ),
            self.reading(
                DevicePropertyValueType::RollerState,
                PropertyValue::RollerState(self.state),
                at,
            ),
        ]
    }

    fn reading(
        &self,
        value_type: DevicePropertyValueType,
        value: PropertyValue,
        at: Timestamp,
    ) -> Reading {
        Reading {
            property_id: self.property_id.clone(),
            value_type,
            value,
            timestamp: at,
            display_name: "Virtual Roller".to_string(),
        }
    }
}
