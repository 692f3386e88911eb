//! `SQLite` implementation of [`ValueRepository`].
//!
//! Every recorded value is appended; the latest value for a
//! `(property, value type)` pair is the row inserted last. Non-finite floats
//! are refused so a stored row always decodes.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use propstate_app::ports::ValueRepository;
use propstate_domain::data::DataWithTimestamp;
use propstate_domain::error::PropStateError;
use propstate_domain::id::DevicePropertyId;
use propstate_domain::time::parse_rfc3339;
use propstate_domain::value::PropertyValue;
use propstate_domain::value_type::DevicePropertyValueType;

use crate::error::{StorageError, decode};

struct Wrapper(DataWithTimestamp<PropertyValue>);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let value_json: String = row.try_get("value")?;
        let recorded_at: String = row.try_get("recorded_at")?;

        let value: PropertyValue = serde_json::from_str(&value_json).map_err(decode)?;
        let recorded_at = parse_rfc3339(&recorded_at).map_err(decode)?;

        Ok(Self(DataWithTimestamp::new(value, recorded_at)))
    }
}

const INSERT: &str = r"
    INSERT INTO property_values (property_id, value_type, display_name, value, recorded_at)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_LATEST: &str = r"
    SELECT value, recorded_at FROM property_values
    WHERE property_id = ? AND value_type = ?
    ORDER BY id DESC
    LIMIT 1
";

/// `SQLite`-backed value repository.
#[derive(Clone)]
pub struct SqliteValueRepository {
    pool: SqlitePool,
}

impl SqliteValueRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ValueRepository for SqliteValueRepository {
    async fn find_latest_value(
        &self,
        property_id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
    ) -> Result<Option<DataWithTimestamp<PropertyValue>>, PropStateError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_LATEST)
            .bind(property_id.to_string())
            .bind(value_type.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn insert(
        &self,
        property_id: &DevicePropertyId,
        value_type: DevicePropertyValueType,
        display_name: &str,
        data: DataWithTimestamp<PropertyValue>,
    ) -> Result<(), PropStateError> {
        if !data.value.is_finite() {
            return Err(StorageError::NonFinite(data.value).into());
        }
        let value_json = serde_json::to_string(&data.value).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(property_id.to_string())
            .bind(value_type.as_str())
            .bind(display_name)
            .bind(&value_json)
            .bind(data.timestamp.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use propstate_domain::id::DeviceId;
    use propstate_domain::time::now;
    use propstate_domain::value::RollerState;

    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteValueRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteValueRepository::new(db.pool().clone())
    }

    fn property_id(device: &str) -> DevicePropertyId {
        DevicePropertyId::new(DeviceId::new(device, "shelly25").unwrap(), 0)
    }

    #[tokio::test]
    async fn should_return_none_when_nothing_recorded() {
        let repo = setup().await;
        let latest = repo
            .find_latest_value(&property_id("abc"), DevicePropertyValueType::RollerPosition)
            .await
            .unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn should_return_last_inserted_value_when_several_recorded() {
        let repo = setup().await;
        let id = property_id("abc");
        let t0 = now();

        for (i, position) in [10_i64, 55, 30].into_iter().enumerate() {
            let at = t0 + Duration::seconds(i64::try_from(i).unwrap());
            repo.insert(
                &id,
                DevicePropertyValueType::RollerPosition,
                "Blinds",
                DataWithTimestamp::new(PropertyValue::Integer(position), at),
            )
            .await
            .unwrap();
        }

        let latest = repo
            .find_latest_value(&id, DevicePropertyValueType::RollerPosition)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.value, PropertyValue::Integer(30));
        assert_eq!(latest.timestamp, t0 + Duration::seconds(2));
    }

    #[tokio::test]
    async fn should_prefer_insertion_order_over_timestamp() {
        let repo = setup().await;
        let id = property_id("abc");
        let t0 = now();

        repo.insert(
            &id,
            DevicePropertyValueType::RelayState,
            "Lamp",
            DataWithTimestamp::new(PropertyValue::Boolean(true), t0),
        )
        .await
        .unwrap();
        repo.insert(
            &id,
            DevicePropertyValueType::RelayState,
            "Lamp",
            DataWithTimestamp::new(PropertyValue::Boolean(false), t0 - Duration::minutes(5)),
        )
        .await
        .unwrap();

        let latest = repo
            .find_latest_value(&id, DevicePropertyValueType::RelayState)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.value, PropertyValue::Boolean(false));
    }

    #[tokio::test]
    async fn should_keep_value_types_apart() {
        let repo = setup().await;
        let id = property_id("abc");
        let t0 = now();

        repo.insert(
            &id,
            DevicePropertyValueType::RollerPosition,
            "Blinds",
            DataWithTimestamp::new(PropertyValue::Integer(40), t0),
        )
        .await
        .unwrap();
        repo.insert(
            &id,
            DevicePropertyValueType::RollerState,
            "Blinds",
            DataWithTimestamp::new(PropertyValue::RollerState(RollerState::Closing), t0),
        )
        .await
        .unwrap();

        let position = repo
            .find_latest_value(&id, DevicePropertyValueType::RollerPosition)
            .await
            .unwrap()
            .unwrap();
        let state = repo
            .find_latest_value(&id, DevicePropertyValueType::RollerState)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(position.value, PropertyValue::Integer(40));
        assert_eq!(state.value, PropertyValue::RollerState(RollerState::Closing));
        assert_eq!(state.timestamp, t0);
    }

    #[tokio::test]
    async fn should_round_trip_float_values_exactly() {
        let repo = setup().await;
        let id = property_id("meter");
        let value = PropertyValue::Double(1234.567_890_123);

        repo.insert(
            &id,
            DevicePropertyValueType::Power,
            "Meter",
            DataWithTimestamp::new(value, now()),
        )
        .await
        .unwrap();

        let latest = repo
            .find_latest_value(&id, DevicePropertyValueType::Power)
            .await
            .unwrap()
            .unwrap();
        assert!(latest.value.same_value(&value));
    }

    #[tokio::test]
    async fn should_round_trip_doubles_that_need_exact_parsing() {
        let repo = setup().await;
        let id = property_id("meter");
        let value = PropertyValue::Double(1.071_566_039_146_582_6e-75);

        repo.insert(
            &id,
            DevicePropertyValueType::Power,
            "Meter",
            DataWithTimestamp::new(value, now()),
        )
        .await
        .unwrap();

        let latest = repo
            .find_latest_value(&id, DevicePropertyValueType::Power)
            .await
            .unwrap()
            .unwrap();
        let PropertyValue::Double(stored) = latest.value else {
            panic!("expected a double, got {:?}", latest.value);
        };
        assert_eq!(stored.to_bits(), 1.071_566_039_146_582_6e-75_f64.to_bits());
    }

    #[tokio::test]
    async fn should_refuse_non_finite_value_and_keep_previous_row() {
        let repo = setup().await;
        let id = property_id("thermo");
        let t0 = now();

        repo.insert(
            &id,
            DevicePropertyValueType::Temperature,
            "Thermo",
            DataWithTimestamp::new(PropertyValue::Float(21.5), t0),
        )
        .await
        .unwrap();

        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let result = repo
                .insert(
                    &id,
                    DevicePropertyValueType::Temperature,
                    "Thermo",
                    DataWithTimestamp::new(PropertyValue::Float(bad), t0),
                )
                .await;
            assert!(matches!(result, Err(PropStateError::Storage(_))));
        }

        let latest = repo
            .find_latest_value(&id, DevicePropertyValueType::Temperature)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.value, PropertyValue::Float(21.5));
    }
}
