//! Identifiers: devices, device properties, and events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifies a physical or virtual device by its `(id, type)` pair.
///
/// Both parts are trimmed and lowercased on construction, so two ids that
/// differ only in case compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DeviceId {
    id: String,
    device_type: String,
}

impl DeviceId {
    /// Build a normalised device id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when either part is blank, or when the
    /// device type contains the `:` separator.
    pub fn new(
        id: impl AsRef<str>,
        device_type: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let id = id.as_ref().trim().to_lowercase();
        let device_type = device_type.as_ref().trim().to_lowercase();
        if id.is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        if device_type.is_empty() {
            return Err(ValidationError::EmptyDeviceType);
        }
        if device_type.contains(':') {
            return Err(ValidationError::SeparatorInDeviceType(device_type));
        }
        Ok(Self { id, device_type })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn device_type(&self) -> &str {
        &self.device_type
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device_type, self.id)
    }
}

impl FromStr for DeviceId {
    type Err = ValidationError;

    /// Parse the `"<type>:<id>"` form produced by [`Display`](fmt::Display).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (device_type, id) = s
            .split_once(':')
            .ok_or_else(|| ValidationError::MalformedPropertyId(s.to_string()))?;
        Self::new(id, device_type)
    }
}

impl From<DeviceId> for String {
    fn from(value: DeviceId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DeviceId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Identifies one measurable or controllable aspect of a device,
/// e.g. "temperature sensor #0".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DevicePropertyId {
    device_id: DeviceId,
    slot: u32,
}

impl DevicePropertyId {
    #[must_use]
    pub fn new(device_id: DeviceId, slot: u32) -> Self {
        Self { device_id, slot }
    }

    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    #[must_use]
    pub fn slot(&self) -> u32 {
        self.slot
    }
}

impl fmt::Display for DevicePropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.slot)
    }
}

impl FromStr for DevicePropertyId {
    type Err = ValidationError;

    /// Parse the `"<type>:<id>/<slot>"` form produced by [`Display`](fmt::Display).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedPropertyId(s.to_string());
        let (device, slot) = s.rsplit_once('/').ok_or_else(malformed)?;
        let slot = slot.parse().map_err(|_| malformed())?;
        let device_id = device.parse().map_err(|_| malformed())?;
        Ok(Self::new(device_id, slot))
    }
}

impl From<DevicePropertyId> for String {
    fn from(value: DevicePropertyId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DevicePropertyId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Unique identifier for an [`Event`](crate::event::Event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(uuid::Uuid);

impl Default for EventId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl EventId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}
