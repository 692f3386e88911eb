//! Value envelope: a value paired with the instant it was observed.

use serde::{Deserialize, Serialize};

use crate::error::ValueKindMismatch;
use crate::time::Timestamp;
use crate::value::{PropertyValue, ValueKind};

/// An observed value and its timestamp.
///
/// The timestamp is metadata: [`same_value`](Self::same_value) compares
/// only the values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataWithTimestamp<T> {
    pub value: T,
    pub timestamp: Timestamp,
}

impl<T> DataWithTimestamp<T> {
    #[must_use]
    pub fn new(value: T, timestamp: Timestamp) -> Self {
        Self { value, timestamp }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DataWithTimestamp<U> {
        DataWithTimestamp {
            value: f(self.value),
            timestamp: self.timestamp,
        }
    }
}

impl<T: ValueKind> DataWithTimestamp<T> {
    #[must_use]
    pub fn same_value(&self, other: &Self) -> bool {
        self.value.same_value(&other.value)
    }

    /// Erase the static value kind.
    #[must_use]
    pub fn into_stored(self) -> DataWithTimestamp<PropertyValue> {
        self.map(ValueKind::into_value)
    }
}

impl DataWithTimestamp<PropertyValue> {
    /// Recover a statically-typed envelope from a stored one.
    ///
    /// # Errors
    ///
    /// Returns [`ValueKindMismatch`] when the stored value is not a `T`.
    pub fn try_into_typed<T: ValueKind>(self) -> Result<DataWithTimestamp<T>, ValueKindMismatch> {
        Ok(DataWithTimestamp {
            value: T::from_value(self.value)?,
            timestamp: self.timestamp,
        })
    }
}
