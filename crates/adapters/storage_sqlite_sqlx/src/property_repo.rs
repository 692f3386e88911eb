//! `SQLite` implementation of [`PropertyRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use propstate_app::ports::PropertyRepository;
use propstate_domain::error::PropStateError;
use propstate_domain::id::DevicePropertyId;
use propstate_domain::property::{DeviceProperty, DevicePropertyType};
use propstate_domain::time::parse_rfc3339;

use crate::error::{StorageError, decode};

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(DeviceProperty);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let property_id: String = row.try_get("property_id")?;
        let property_type: String = row.try_get("property_type")?;
        let created_at: String = row.try_get("created_at")?;

        let id: DevicePropertyId = property_id.parse().map_err(decode)?;
        let property_type: DevicePropertyType = property_type.parse().map_err(decode)?;
        let created_at = parse_rfc3339(&created_at).map_err(decode)?;

        Ok(Self(DeviceProperty::new(id, property_type, created_at)))
    }
}

const UPSERT: &str = r"
    INSERT OR REPLACE INTO properties
        (property_id, device_id, device_type, slot, property_type, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM properties WHERE property_id = ?";

const SELECT_BY_TYPE: &str =
    "SELECT * FROM properties WHERE property_type = ? ORDER BY device_type, device_id, slot";

const DELETE: &str = "DELETE FROM properties WHERE property_id = ?";

/// `SQLite`-backed property repository.
#[derive(Clone)]
pub struct SqlitePropertyRepository {
    pool: SqlitePool,
}

impl SqlitePropertyRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl PropertyRepository for SqlitePropertyRepository {
    async fn find_by_property_id(
        &self,
        id: &DevicePropertyId,
    ) -> Result<Option<DeviceProperty>, PropStateError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn save(&self, property: DeviceProperty) -> Result<DeviceProperty, PropStateError> {
        let device = property.id.device_id();
        sqlx::query(UPSERT)
            .bind(property.id.to_string())
            .bind(device.id())
            .bind(device.device_type())
            .bind(i64::from(property.id.slot()))
            .bind(property.property_type.as_str())
            .bind(property.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(property)
    }

    async fn delete(&self, id: &DevicePropertyId) -> Result<bool, PropStateError> {
        let result = sqlx::query(DELETE)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_type(
        &self,
        property_type: DevicePropertyType,
    ) -> Result<Vec<DeviceProperty>, PropStateError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_TYPE)
            .bind(property_type.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
