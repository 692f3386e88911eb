//! # propstate-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `PropertyRepository`: lookup, create and delete device properties
//!   - `ValueRepository`: latest value per property and value type, append
//!   - `EventPublisher`: fan events out to subscribers
//! - Provide the use-cases:
//!   - `PropertyService`: ensure a property exists, get, list, delete
//!   - `ValueUpdateService`: record a value and raise updated/changed events
//!   - `ValueUpdaters`: one engine per value type, dispatching readings
//! - Provide **in-process infrastructure** (event bus, keyed locks) that
//!   doesn't need IO
//!
//! ## Dependency rule
//! Depends on `propstate-domain` only (plus `tokio::sync` for channels and
//! locks). Never imports adapter crates.

pub mod event_bus;
pub mod keyed_lock;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
