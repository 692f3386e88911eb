//! # propstate-adapter-virtual
//!
//! Virtual/demo integration that feeds simulated readings into the
//! value-update pipeline.
//!
//! ## Provided devices
//!
//! | Device | Property | Value types | Behaviour |
//! |--------|----------|-------------|-----------|
//! | Virtual Relay | `virtual:relay/0` | `relay_state` | Toggles every few ticks, repeats otherwise |
//! | Virtual Thermometer | `virtual:thermometer/0` | `temperature` | Drifts by tenths of a degree |
//! | Virtual Roller | `virtual:roller/0` | `roller_position`, `roller_state` | Opens, pauses, closes |
//!
//! ## Dependency rule
//!
//! Depends on `propstate-app` (services, ports) and `propstate-domain` only.

mod devices;

use std::time::Duration;

use propstate_app::ports::{EventPublisher, PropertyRepository, ValueRepository};
use propstate_app::services::value_updaters::{Reading, ValueUpdaters};
use propstate_domain::error::PropStateError;
use propstate_domain::time::{Timestamp, now};

pub use devices::{DEVICE_TYPE, VirtualDevice, VirtualRelay, VirtualRoller, VirtualThermometer};

/// Virtual integration driving a fixed set of simulated devices.
pub struct VirtualIntegration {
    devices: Vec<VirtualDevice>,
}

impl VirtualIntegration {
    /// Create the default relay, thermometer and roller.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a device identity is invalid.
    pub fn new() -> Result<Self, PropStateError> {
        Ok(Self {
            devices: vec![
                VirtualDevice::Relay(VirtualRelay::new("relay", 5)?),
                VirtualDevice::Thermometer(VirtualThermometer::new("thermometer", 21.5)?),
                VirtualDevice::Roller(VirtualRoller::new("roller", 20)?),
            ],
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        "virtual"
    }

    #[must_use]
    pub fn devices(&self) -> &[VirtualDevice] {
        &self.devices
    }

    /// Advance every device one step and collect their readings.
    pub fn tick(&mut self, at: Timestamp) -> Vec<Reading> {
        self.devices.iter_mut().flat_map(|d| d.tick(at)).collect()
    }

    /// Tick every `period` and record the readings, until the returned
    /// future is dropped.
    ///
    /// A reading that fails to record is logged and skipped.
    pub async fn run<PR, VR, P>(mut self, updaters: &ValueUpdaters<PR, VR, P>, period: Duration)
    where
        PR: PropertyRepository,
        VR: ValueRepository,
        P: EventPublisher,
    {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        tracing::info!(devices = self.devices.len(), ?period, "virtual integration started");

        loop {
            interval.tick().await;
            for reading in self.tick(now()) {
                if let Err(err) = updaters.record(&reading).await {
                    tracing::warn!(
                        error = %err,
                        property_id = %reading.property_id,
                        value_type = %reading.value_type,
                        "failed to record virtual reading"
                    );
                }
            }
        }
    }
}
