//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PropStateError`] via `#[from]` (or `From` impls for adapter errors).

use crate::id::DevicePropertyId;
use crate::property::DevicePropertyType;
use crate::value::ValueKindTag;

/// Top-level error shared by the domain and application layers.
#[derive(Debug, thiserror::Error)]
pub enum PropStateError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("property type mismatch")]
    PropertyTypeMismatch(#[from] PropertyTypeMismatch),

    #[error("value kind mismatch")]
    ValueKindMismatch(#[from] ValueKindMismatch),

    /// Failure reported by a repository or other driven adapter.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations detected while constructing values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device id must not be empty")]
    EmptyDeviceId,

    #[error("device type must not be empty")]
    EmptyDeviceType,

    #[error("device type {0:?} must not contain ':'")]
    SeparatorInDeviceType(String),

    #[error("malformed property id {0:?}")]
    MalformedPropertyId(String),

    #[error("unknown {kind} {value:?}")]
    UnknownTag { kind: &'static str, value: String },
}

/// A lookup did not find the requested record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A property exists but was registered with a different behavioural type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("property {property_id} is a {stored}, not a {requested}")]
pub struct PropertyTypeMismatch {
    pub property_id: DevicePropertyId,
    pub stored: DevicePropertyType,
    pub requested: DevicePropertyType,
}

/// A value does not carry the kind its value type expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected a {expected} value, got {actual}")]
pub struct ValueKindMismatch {
    pub expected: ValueKindTag,
    pub actual: ValueKindTag,
}
