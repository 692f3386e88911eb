//! Per-kind engine configurations, one per entry of the value-type
//! registry.
//!
//! Each instantiation is pure configuration: the property type and value
//! type it manages and the default updated/changed event constructors.

use propstate_domain::value::{AlarmState, RollerState};
use propstate_domain::value_type::DevicePropertyValueType;

use crate::services::value_update_service::ValueUpdateConfig;

macro_rules! value_configs {
    ($($name:ident: $ty:ty => $variant:ident;)*) => {
        $(
            #[doc = concat!(
                "Engine configuration for [`DevicePropertyValueType::",
                stringify!($variant),
                "`]."
            )]
            #[must_use]
            pub fn $name() -> ValueUpdateConfig<$ty> {
                ValueUpdateConfig::unchecked(DevicePropertyValueType::$variant)
            }
        )*

        #[cfg(test)]
        const CONFIGURED: &[(DevicePropertyValueType, propstate_domain::value::ValueKindTag)] = &[
            $((
                DevicePropertyValueType::$variant,
                <$ty as propstate_domain::value::ValueKind>::TAG,
            ),)*
        ];
    };
}

value_configs! {
    temperature: f32 => Temperature;
    humidity: f32 => Humidity;
    pressure: f32 => Pressure;
    illuminance: f32 => Illuminance;
    co2: i64 => Co2;
    power: f64 => Power;
    battery_level: i64 => BatteryLevel;
    dimming_level: i64 => DimmingLevel;
    relay_state: bool => RelayState;
    window_open: bool => WindowOpen;
    window_tilt: bool => WindowTilt;
    roller_position: i64 => RollerPosition;
    roller_state: RollerState => RollerState;
    alarm_state: AlarmState => AlarmState;
    smoke_state: bool => SmokeState;
    motion_state: bool => MotionState;
    wind_speed: f32 => WindSpeed;
    wind_gust: f32 => WindGust;
    wind_direction: i64 => WindDirection;
    wind_run: f64 => WindRun;
    rain_rate: f32 => RainRate;
    rain_interval: f32 => RainInterval;
    rain_today: f32 => RainToday;
    cloud_base: i64 => CloudBase;
    uv_index: f32 => UvIndex;
    lightning_distance: f32 => LightningDistance;
    lightning_count: i64 => LightningCount;
}
