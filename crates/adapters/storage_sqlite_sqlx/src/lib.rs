//! # propstate-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `propstate-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `propstate-app` (for port traits) and `propstate-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod property_repo;
mod value_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use property_repo::SqlitePropertyRepository;
pub use value_repo::SqliteValueRepository;
