//! Property values: the closed set of value kinds a property can carry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueKindMismatch;

/// Motion state reported by a roller shutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollerState {
    Opening,
    Closing,
    Idle,
}

impl fmt::Display for RollerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opening => f.write_str("opening"),
            Self::Closing => f.write_str("closing"),
            Self::Idle => f.write_str("idle"),
        }
    }
}

/// State reported by an alarm panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmState {
    Off,
    Burglar,
    Fire,
    PreAlarm,
    Silenced,
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::Burglar => f.write_str("burglar"),
            Self::Fire => f.write_str("fire"),
            Self::PreAlarm => f.write_str("pre_alarm"),
            Self::Silenced => f.write_str("silenced"),
        }
    }
}

/// The underlying representation of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKindTag {
    Boolean,
    Integer,
    Float,
    Double,
    RollerState,
    AlarmState,
}

impl fmt::Display for ValueKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double"),
            Self::RollerState => f.write_str("roller state"),
            Self::AlarmState => f.write_str("alarm state"),
        }
    }
}

/// A dynamically-typed property value, as stored by repositories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Float(f32),
    Double(f64),
    RollerState(RollerState),
    AlarmState(AlarmState),
}

impl PropertyValue {
    #[must_use]
    pub fn kind(&self) -> ValueKindTag {
        match self {
            Self::Boolean(_) => ValueKindTag::Boolean,
            Self::Integer(_) => ValueKindTag::Integer,
            Self::Float(_) => ValueKindTag::Float,
            Self::Double(_) => ValueKindTag::Double,
            Self::RollerState(_) => ValueKindTag::RollerState,
            Self::AlarmState(_) => ValueKindTag::AlarmState,
        }
    }

    /// `false` for NaN and infinite floats, `true` for everything else.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(v) => v.is_finite(),
            Self::Double(v) => v.is_finite(),
            _ => true,
        }
    }

    /// Equality used for change detection.
    ///
    /// Floats are compared exactly: equal when `==` holds or when the bit
    /// patterns are identical (a repeated NaN is not a change). Values of
    /// different kinds are never the same.
    #[must_use]
    pub fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.same_value(b),
            (Self::Double(a), Self::Double(b)) => a.same_value(b),
            _ => self == other,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => v.fmt(f),
            Self::Integer(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::Double(v) => v.fmt(f),
            Self::RollerState(v) => v.fmt(f),
            Self::AlarmState(v) => v.fmt(f),
        }
    }
}

/// A statically-typed value kind handled by a value-update engine.
pub trait ValueKind: Copy + fmt::Debug + Send + Sync + 'static {
    const TAG: ValueKindTag;

    fn into_value(self) -> PropertyValue;

    /// Extract `Self` from a stored value.
    ///
    /// # Errors
    ///
    /// Returns [`ValueKindMismatch`] when `value` carries another kind.
    fn from_value(value: PropertyValue) -> Result<Self, ValueKindMismatch>;

    /// Change-detection equality; see [`PropertyValue::same_value`].
    fn same_value(&self, other: &Self) -> bool;
}

fn mismatch(expected: ValueKindTag, value: &PropertyValue) -> ValueKindMismatch {
    ValueKindMismatch {
        expected,
        actual: value.kind(),
    }
}

macro_rules! impl_value_kind {
    ($ty:ty, $variant:ident) => {
        impl ValueKind for $ty {
            const TAG: ValueKindTag = ValueKindTag::$variant;

            fn into_value(self) -> PropertyValue {
                PropertyValue::$variant(self)
            }

            fn from_value(value: PropertyValue) -> Result<Self, ValueKindMismatch> {
                match value {
                    PropertyValue::$variant(v) => Ok(v),
                    other => Err(mismatch(Self::TAG, &other)),
                }
            }

            fn same_value(&self, other: &Self) -> bool {
                self == other
            }
        }
    };
    ($ty:ty, $variant:ident, bits) => {
        impl ValueKind for $ty {
            const TAG: ValueKindTag = ValueKindTag::$variant;

            fn into_value(self) -> PropertyValue {
                PropertyValue::$variant(self)
            }

            fn from_value(value: PropertyValue) -> Result<Self, ValueKindMismatch> {
                match value {
                    PropertyValue::$variant(v) => Ok(v),
                    other => Err(mismatch(Self::TAG, &other)),
                }
            }

            #[allow(clippy::float_cmp)]
            fn same_value(&self, other: &Self) -> bool {
                self == other || self.to_bits() == other.to_bits()
            }
        }
    };
}

impl_value_kind!(bool, Boolean);
impl_value_kind!(i64, Integer);
impl_value_kind!(f32, Float, bits);
impl_value_kind!(f64, Double, bits);
impl_value_kind!(RollerState, RollerState);
impl_value_kind!(AlarmState, AlarmState);
