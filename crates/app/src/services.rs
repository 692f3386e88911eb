//! Application services.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod property_service;
pub mod value_kinds;
pub mod value_update_service;
pub mod value_updaters;
