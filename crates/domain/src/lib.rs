//! # propstate-domain
//!
//! Pure domain model for tracking the latest known value of device properties.
//!
//! ## Responsibilities
//! - Identity: [`DeviceId`](id::DeviceId), [`DevicePropertyId`](id::DevicePropertyId)
//! - Static registries: property types and value types (kind, unit, owner)
//! - Values: the closed [`PropertyValue`](value::PropertyValue) union and the
//!   [`ValueKind`](value::ValueKind) trait bridging it to Rust types
//! - Envelopes: [`DataWithTimestamp`](data::DataWithTimestamp)
//! - Events: lifecycle and updated/changed value events, message keys
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod data;
pub mod event;
pub mod message;
pub mod property;
pub mod value;
pub mod value_type;
