//! Virtual device implementations: relay, thermometer, roller.
//!
//! Each device owns a fixed [`DevicePropertyId`] so readings land on the same
//! property across restarts, and advances its simulated state one step per
//! tick.

mod relay;
mod roller;
mod thermometer;

pub use relay::VirtualRelay;
pub use roller::VirtualRoller;
pub use thermometer::VirtualThermometer;

use propstate_app::services::value_updaters::Reading;
use propstate_domain::error::PropStateError;
use propstate_domain::id::{DeviceId, DevicePropertyId};
use propstate_domain::time::Timestamp;

/// Device type used for every simulated device.
pub const DEVICE_TYPE: &str = "virtual";

/// Wrapper enum for the concrete virtual device types.
pub enum VirtualDevice {
    Relay(VirtualRelay),
    Thermometer(VirtualThermometer),
    Roller(VirtualRoller),
}

impl VirtualDevice {
    /// Advance the simulation one step and report the resulting readings.
    pub fn tick(&mut self, at: Timestamp) -> Vec<Reading> {
        match self {
            Self::Relay(d) => d.tick(at),
            Self::Thermometer(d) => d.tick(at),
            Self::Roller(d) => d.tick(at),
        }
    }

    #[must_use]
    pub fn property_id(&self) -> &DevicePropertyId {
        match self {
            Self::Relay(d) => d.property_id(),
            Self::Thermometer(d) => d.property_id(),
            Self::Roller(d) => d.property_id(),
        }
    }
}

pub(crate) fn virtual_property(id: &str) -> Result<DevicePropertyId, PropStateError> {
    Ok(DevicePropertyId::new(DeviceId::new(id, DEVICE_TYPE)?, 0))
}
