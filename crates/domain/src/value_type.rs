//! Static registry of value types: one entry per measurement concept.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::property::DevicePropertyType;
use crate::value::ValueKindTag;

/// Value semantics carried by a property: underlying kind, unit and the
/// owning [`DevicePropertyType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePropertyValueType {
    Temperature,
    Humidity,
    Pressure,
    Illuminance,
    Co2,
    Power,
    BatteryLevel,
    DimmingLevel,
    RelayState,
    WindowOpen,
    WindowTilt,
    RollerPosition,
    RollerState,
    AlarmState,
    SmokeState,
    MotionState,
    WindSpeed,
    WindGust,
    WindDirection,
    WindRun,
    RainRate,
    RainInterval,
    RainToday,
    CloudBase,
    UvIndex,
    LightningDistance,
    LightningCount,
}

/// One row of the registry.
struct Entry {
    name: &'static str,
    kind: ValueKindTag,
    unit: &'static str,
    property_type: DevicePropertyType,
}

const fn entry(
    name: &'static str,
    kind: ValueKindTag,
    unit: &'static str,
    property_type: DevicePropertyType,
) -> Entry {
    Entry {
        name,
        kind,
        unit,
        property_type,
    }
}

impl DevicePropertyValueType {
    pub const ALL: &[Self] = &[
        Self::Temperature,
        Self::Humidity,
        Self::Pressure,
        Self::Illuminance,
        Self::Co2,
        Self::Power,
        Self::BatteryLevel,
        Self::DimmingLevel,
        Self::RelayState,
        Self::WindowOpen,
        Self::WindowTilt,
        Self::RollerPosition,
        Self::RollerState,
        Self::AlarmState,
        Self::SmokeState,
        Self::MotionState,
        Self::WindSpeed,
        Self::WindGust,
        Self::WindDirection,
        Self::WindRun,
        Self::RainRate,
        Self::RainInterval,
        Self::RainToday,
        Self::CloudBase,
        Self::UvIndex,
        Self::LightningDistance,
        Self::LightningCount,
    ];

    const fn entry(self) -> Entry {
        use DevicePropertyType as P;
        use ValueKindTag as K;

        match self {
            Self::Temperature => entry("temperature", K::Float, "\u{b0}C", P::TemperatureSensor),
            Self::Humidity => entry("humidity", K::Float, "%", P::HumiditySensor),
            Self::Pressure => entry("pressure", K::Float, "hPa", P::PressureSensor),
            Self::Illuminance => entry("illuminance", K::Float, "lx", P::LightSensor),
            Self::Co2 => entry("co2", K::Integer, "ppm", P::Co2Sensor),
            Self::Power => entry("power", K::Double, "W", P::PowerMeter),
            Self::BatteryLevel => entry("battery_level", K::Integer, "%", P::Battery),
            Self::DimmingLevel => entry("dimming_level", K::Integer, "%", P::Dimmer),
            Self::RelayState => entry("relay_state", K::Boolean, "", P::Relay),
            Self::WindowOpen => entry("window_open", K::Boolean, "", P::WindowSensor),
            Self::WindowTilt => entry("window_tilt", K::Boolean, "", P::WindowSensor),
            Self::RollerPosition => entry("roller_position", K::Integer, "%", P::Roller),
            Self::RollerState => entry("roller_state", K::RollerState, "", P::Roller),
            Self::AlarmState => entry("alarm_state", K::AlarmState, "", P::Alarm),
            Self::SmokeState => entry("smoke_state", K::Boolean, "", P::SmokeDetector),
            Self::MotionState => entry("motion_state", K::Boolean, "", P::MotionSensor),
            Self::WindSpeed => entry("wind_speed", K::Float, "km/h", P::WindSensor),
            Self::WindGust => entry("wind_gust", K::Float, "km/h", P::WindSensor),
            Self::WindDirection => entry("wind_direction", K::Integer, "\u{b0}", P::WindSensor),
            Self::WindRun => entry("wind_run", K::Double, "km", P::WindSensor),
            Self::RainRate => entry("rain_rate", K::Float, "mm/h", P::RainSensor),
            Self::RainInterval => entry("rain_interval", K::Float, "mm", P::RainSensor),
            Self::RainToday => entry("rain_today", K::Float, "mm", P::RainSensor),
            Self::CloudBase => entry("cloud_base", K::Integer, "m", P::CloudBaseSensor),
            Self::UvIndex => entry("uv_index", K::Float, "", P::UvSensor),
            Self::LightningDistance => {
                entry("lightning_distance", K::Float, "km", P::LightningSensor)
            }
            Self::LightningCount => entry("lightning_count", K::Integer, "", P::LightningSensor),
        }
    }

    /// Stable `snake_case` name, used as the storage key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.entry().name
    }

    #[must_use]
    pub const fn kind(self) -> ValueKindTag {
        self.entry().kind
    }

    /// Display unit; empty for unitless values.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        self.entry().unit
    }

    #[must_use]
    pub const fn property_type(self) -> DevicePropertyType {
        self.entry().property_type
    }
}

impl fmt::Display for DevicePropertyValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DevicePropertyValueType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|vt| vt.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownTag {
                kind: "value type",
                value: s.to_string(),
            })
    }
}
