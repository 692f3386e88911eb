//! Storage-specific error type wrapping sqlx errors.

use propstate_domain::error::PropStateError;
use propstate_domain::value::PropertyValue;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to encode a value as JSON.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// NaN and infinities have no JSON form and are refused before writing.
    #[error("non-finite value {0} cannot be stored")]
    NonFinite(PropertyValue),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for PropStateError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Wrap a row-level conversion failure as a sqlx decode error.
pub(crate) fn decode<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}
