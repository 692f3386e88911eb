//! Translatable message keys and arguments for property-value events.
//!
//! Key selection depends only on the value type, the event kind and the new
//! value. Everything here is pure.

use crate::event::ValueEventKind;
use crate::value::{AlarmState, PropertyValue, RollerState};
use crate::value_type::DevicePropertyValueType;

/// `(changed, updated)` keys for numeric value types.
fn numeric_keys(value_type: DevicePropertyValueType) -> Option<(&'static str, &'static str)> {
    use DevicePropertyValueType as V;

    let keys = match value_type {
        V::Temperature => ("temperatureChangedTo", "temperatureReportedAs"),
        V::Humidity => ("humidityChangedTo", "humidityReportedAs"),
        V::Pressure => ("pressureChangedTo", "pressureReportedAs"),
        V::Illuminance => ("illuminanceChangedTo", "illuminanceReportedAs"),
        V::Co2 => ("co2ChangedTo", "co2ReportedAs"),
        V::Power => ("powerChangedTo", "powerReportedAs"),
        V::BatteryLevel => ("batteryLevelChangedTo", "batteryLevelReportedAs"),
        V::DimmingLevel => ("dimmingLevelChangedTo", "dimmingLevelReportedAs"),
        V::RollerPosition => ("rollerPositionChangedTo", "rollerPositionReportedAs"),
        V::WindSpeed => ("windSpeedChangedTo", "windSpeedReportedAs"),
        V::WindGust => ("windGustChangedTo", "windGustReportedAs"),
        V::WindDirection => ("windDirectionChangedTo", "windDirectionReportedAs"),
        V::WindRun => ("windRunChangedTo", "windRunReportedAs"),
        V::RainRate => ("rainRateChangedTo", "rainRateReportedAs"),
        V::RainInterval => ("rainIntervalChangedTo", "rainIntervalReportedAs"),
        V::RainToday => ("rainTodayChangedTo", "rainTodayReportedAs"),
        V::CloudBase => ("cloudBaseChangedTo", "cloudBaseReportedAs"),
        V::UvIndex => ("uvIndexChangedTo", "uvIndexReportedAs"),
        V::LightningDistance => ("lightningDistanceChangedTo", "lightningDistanceReportedAs"),
        V::LightningCount => ("lightningCountChangedTo", "lightningCountReportedAs"),
        V::RelayState
        | V::WindowOpen
        | V::WindowTilt
        | V::RollerState
        | V::AlarmState
        | V::SmokeState
        | V::MotionState => return None,
    };
    Some(keys)
}

/// `(true, false)` keys for boolean value types.
fn boolean_keys(value_type: DevicePropertyValueType) -> Option<(&'static str, &'static str)> {
    use DevicePropertyValueType as V;

    match value_type {
        V::RelayState => Some(("relaySwitchedOn", "relaySwitchedOff")),
        V::WindowOpen => Some(("windowOpened", "windowClosed")),
        V::WindowTilt => Some(("windowTilted", "windowUntilted")),
        V::SmokeState => Some(("smokeDetected", "smokeCleared")),
        V::MotionState => Some(("motionDetected", "motionCleared")),
        _ => None,
    }
}

fn roller_key(state: RollerState) -> &'static str {
    match state {
        RollerState::Opening => "rollerOpening",
        RollerState::Closing => "rollerClosing",
        RollerState::Idle => "rollerIdle",
    }
}

fn alarm_key(state: AlarmState) -> &'static str {
    match state {
        AlarmState::Off => "alarmOff",
        AlarmState::Burglar => "alarmBurglar",
        AlarmState::Fire => "alarmFire",
        AlarmState::PreAlarm => "alarmPreAlarm",
        AlarmState::Silenced => "alarmSilenced",
    }
}

/// Select the message key for an event carrying `value`.
#[must_use]
pub fn message_key(
    value_type: DevicePropertyValueType,
    kind: ValueEventKind,
    value: &PropertyValue,
) -> &'static str {
    match value {
        PropertyValue::Boolean(on) => {
            if let Some((on_key, off_key)) = boolean_keys(value_type) {
                return if *on { on_key } else { off_key };
            }
        }
        PropertyValue::RollerState(state) => return roller_key(*state),
        PropertyValue::AlarmState(state) => return alarm_key(*state),
        PropertyValue::Integer(_) | PropertyValue::Float(_) | PropertyValue::Double(_) => {}
    }
    let (changed, updated) =
        numeric_keys(value_type).unwrap_or(("valueChangedTo", "valueReportedAs"));
    match kind {
        ValueEventKind::Changed => changed,
        ValueEventKind::Updated => updated,
    }
}

/// Ordered arguments for the localized template: display name, value, and
/// the unit when the value type has one.
#[must_use]
pub fn message_args(
    value_type: DevicePropertyValueType,
    display_name: &str,
    value: &PropertyValue,
) -> Vec<String> {
    let mut args = vec![display_name.to_string(), value.to_string()];
    let unit = value_type.unit();
    if !unit.is_empty() {
        args.push(unit.to_string());
    }
    args
}
