//! Device property: one measurable or controllable facet of a device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::DevicePropertyId;
use crate::time::Timestamp;
use crate::value_type::DevicePropertyValueType;

/// Behavioural category of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePropertyType {
    Relay,
    Roller,
    TemperatureSensor,
    HumiditySensor,
    PressureSensor,
    LightSensor,
    Co2Sensor,
    PowerMeter,
    Battery,
    Dimmer,
    WindowSensor,
    Alarm,
    SmokeDetector,
    MotionSensor,
    WindSensor,
    RainSensor,
    CloudBaseSensor,
    UvSensor,
    LightningSensor,
}

impl DevicePropertyType {
    pub const ALL: &[Self] = &[
        Self::Relay,
        Self::Roller,
        Self::TemperatureSensor,
        Self::HumiditySensor,
        Self::PressureSensor,
        Self::LightSensor,
        Self::Co2Sensor,
        Self::PowerMeter,
        Self::Battery,
        Self::Dimmer,
        Self::WindowSensor,
        Self::Alarm,
        Self::SmokeDetector,
        Self::MotionSensor,
        Self::WindSensor,
        Self::RainSensor,
        Self::CloudBaseSensor,
        Self::UvSensor,
        Self::LightningSensor,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relay => "relay",
            Self::Roller => "roller",
            Self::TemperatureSensor => "temperature_sensor",
            Self::HumiditySensor => "humidity_sensor",
            Self::PressureSensor => "pressure_sensor",
            Self::LightSensor => "light_sensor",
            Self::Co2Sensor => "co2_sensor",
            Self::PowerMeter => "power_meter",
            Self::Battery => "battery",
            Self::Dimmer => "dimmer",
            Self::WindowSensor => "window_sensor",
            Self::Alarm => "alarm",
            Self::SmokeDetector => "smoke_detector",
            Self::MotionSensor => "motion_sensor",
            Self::WindSensor => "wind_sensor",
            Self::RainSensor => "rain_sensor",
            Self::CloudBaseSensor => "cloud_base_sensor",
            Self::UvSensor => "uv_sensor",
            Self::LightningSensor => "lightning_sensor",
        }
    }

    /// The value types a property of this type carries.
    pub fn value_types(self) -> impl Iterator<Item = DevicePropertyValueType> {
        DevicePropertyValueType::ALL
            .iter()
            .copied()
            .filter(move |vt| vt.property_type() == self)
    }
}

impl fmt::Display for DevicePropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DevicePropertyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownTag {
                kind: "property type",
                value: s.to_string(),
            })
    }
}

/// A registered property record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProperty {
    pub id: DevicePropertyId,
    pub property_type: DevicePropertyType,
    pub created_at: Timestamp,
}

impl DeviceProperty {
    #[must_use]
    pub fn new(
        id: DevicePropertyId,
        property_type: DevicePropertyType,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            property_type,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_every_type_through_as_str() {
        for ty in DevicePropertyType::ALL {
            assert_eq!(ty.as_str().parse::<DevicePropertyType>().unwrap(), *ty);
        }
    }

    #[test]
    fn should_reject_unknown_type_name() {
        assert!(matches!(
            "toaster".parse::<DevicePropertyType>(),
            Err(ValidationError::UnknownTag { .. })
        ));
    }

    #[test]
    fn should_match_serde_name_with_as_str() {
        let json = serde_json::to_string(&DevicePropertyType::TemperatureSensor).unwrap();
        assert_eq!(json, "\"temperature_sensor\"");
    }

    #[test]
    fn should_list_both_roller_value_types() {
        let types: Vec<_> = DevicePropertyType::Roller.value_types().collect();
        assert_eq!(
            types,
            vec![
                DevicePropertyValueType::RollerPosition,
                DevicePropertyValueType::RollerState
            ]
        );
    }

    #[test]
    fn should_give_every_type_at_least_one_value_type() {
        for ty in DevicePropertyType::ALL {
            assert!(ty.value_types().next().is_some(), "{ty} has no value type");
        }
    }
}
