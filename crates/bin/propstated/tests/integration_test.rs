//! End-to-end tests for the full propstated stack.
//!
//! Each test wires the complete pipeline (in-memory `SQLite`, real repos,
//! real event bus, every value updater) and drives it through
//! [`ValueUpdaters::record`], observing the bus the way subscribers do.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::broadcast;

use propstate_adapter_storage_sqlite_sqlx::{
    Config, Database, SqlitePropertyRepository, SqliteValueRepository,
};
use propstate_app::event_bus::InProcessEventBus;
use propstate_app::services::value_update_service::ValueUpdateContext;
use propstate_app::services::value_updaters::{Reading, ValueUpdaters};
use propstate_domain::error::PropStateError;
use propstate_domain::event::{Event, PropertyValueEvent};
use propstate_domain::id::{DeviceId, DevicePropertyId};
use propstate_domain::property::DevicePropertyType;
use propstate_domain::time::{Timestamp, now};
use propstate_domain::value::PropertyValue;
use propstate_domain::value_type::DevicePropertyValueType;

type Updaters =
    ValueUpdaters<SqlitePropertyRepository, SqliteValueRepository, Arc<InProcessEventBus>>;

struct Stack {
    _db: Database,
    updaters: Updaters,
    events: broadcast::Receiver<Event>,
}

async fn database() -> Database {
    Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise")
}

fn wire(db: &Database) -> (Updaters, broadcast::Receiver<Event>) {
    let bus = Arc::new(InProcessEventBus::new(1024));
    let events = bus.subscribe();
    let ctx = ValueUpdateContext::new(
        SqlitePropertyRepository::new(db.pool().clone()),
        SqliteValueRepository::new(db.pool().clone()),
        bus,
    );
    (ValueUpdaters::new(&ctx), events)
}

async fn stack() -> Stack {
    let db = database().await;
    let (updaters, events) = wire(&db);
    Stack {
        _db: db,
        updaters,
        events,
    }
}

fn drain(events: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

fn relay() -> DevicePropertyId {
    DevicePropertyId::new(DeviceId::new("ABC", "Shelly1").unwrap(), 0)
}

fn relay_reading(on: bool, at: Timestamp) -> Reading {
    Reading {
        property_id: relay(),
        value_type: DevicePropertyValueType::RelayState,
        value: PropertyValue::Boolean(on),
        timestamp: at,
        display_name: "Hall light".to_string(),
    }
}

fn value_payload(event: &Event) -> &PropertyValueEvent {
    event.value_event().expect("value event")
}

// ---------------------------------------------------------------------------
// Relay lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_follow_relay_lifecycle_end_to_end() {
    let mut s = stack().await;
    let t0 = now();

    s.updaters.record(&relay_reading(true, t0)).await.unwrap();
    let first = drain(&mut s.events);
    let names: Vec<_> = first.iter().map(Event::name).collect();
    assert_eq!(names, vec!["property_created", "value_updated", "value_changed"]);
    assert!(value_payload(&first[2]).previous.is_none());
    assert_eq!(value_payload(&first[2]).message_key, "relaySwitchedOn");
    assert_eq!(value_payload(&first[2]).message_args[0], "Hall light");

    s.updaters
        .record(&relay_reading(true, t0 + Duration::seconds(1)))
        .await
        .unwrap();
    let repeat = drain(&mut s.events);
    assert_eq!(repeat.len(), 1);
    assert_eq!(repeat[0].name(), "value_updated");
    assert_eq!(
        value_payload(&repeat[0]).previous.map(|p| p.timestamp),
        Some(t0)
    );

    s.updaters
        .record(&relay_reading(false, t0 + Duration::seconds(2)))
        .await
        .unwrap();
    let off = drain(&mut s.events);
    let names: Vec<_> = off.iter().map(Event::name).collect();
    assert_eq!(names, vec!["value_updated", "value_changed"]);
    let changed = value_payload(&off[1]);
    assert_eq!(changed.current.value, PropertyValue::Boolean(false));
    assert_eq!(
        changed.previous.map(|p| p.value),
        Some(PropertyValue::Boolean(true))
    );
    assert_eq!(changed.message_key, "relaySwitchedOff");

    let current = s
        .updaters
        .current_value(&relay(), DevicePropertyValueType::RelayState)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.value, PropertyValue::Boolean(false));
    assert_eq!(current.timestamp, t0 + Duration::seconds(2));
}

#[tokio::test]
async fn should_normalise_device_identity() {
    let mut s = stack().await;
    s.updaters.record(&relay_reading(true, now())).await.unwrap();

    let events = drain(&mut s.events);
    assert_eq!(events[0].property_id().to_string(), "shelly1:abc/0");
}

// ---------------------------------------------------------------------------
// Persistence across restarts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_compare_against_value_stored_before_restart() {
    let db = database().await;
    let (before, _) = wire(&db);
    before.record(&relay_reading(true, now())).await.unwrap();
    drop(before);

    let (after, mut events) = wire(&db);
    after.record(&relay_reading(true, now())).await.unwrap();

    let names: Vec<_> = drain(&mut events).iter().map(Event::name).collect();
    assert_eq!(names, vec!["value_updated"]);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reject_value_type_owned_by_other_property_type() {
    let mut s = stack().await;
    s.updaters.record(&relay_reading(true, now())).await.unwrap();
    drain(&mut s.events);

    let dimmer = Reading {
        property_id: relay(),
        value_type: DevicePropertyValueType::DimmingLevel,
        value: PropertyValue::Integer(40),
        timestamp: now(),
        display_name: "Hall light".to_string(),
    };
    let result = s.updaters.record(&dimmer).await;

    let Err(PropStateError::PropertyTypeMismatch(mismatch)) = result else {
        panic!("expected a type mismatch, got {result:?}");
    };
    assert_eq!(mismatch.stored, DevicePropertyType::Relay);
    assert_eq!(mismatch.requested, DevicePropertyType::Dimmer);
    assert!(drain(&mut s.events).is_empty());
}

#[tokio::test]
async fn should_reject_reading_of_wrong_kind_without_side_effects() {
    let mut s = stack().await;
    let reading = Reading {
        property_id: relay(),
        value_type: DevicePropertyValueType::RelayState,
        value: PropertyValue::Integer(1),
        timestamp: now(),
        display_name: "Hall light".to_string(),
    };

    assert!(matches!(
        s.updaters.record(&reading).await,
        Err(PropStateError::ValueKindMismatch(_))
    ));
    assert!(drain(&mut s.events).is_empty());
    assert!(
        s.updaters
            .current_value(&relay(), DevicePropertyValueType::RelayState)
            .await
            .unwrap()
            .is_none()
    );
}

// ---------------------------------------------------------------------------
// Floating-point values
// ---------------------------------------------------------------------------

fn reading_of(value_type: DevicePropertyValueType, value: PropertyValue) -> Reading {
    Reading {
        property_id: DevicePropertyId::new(DeviceId::new("meter", "virtual").unwrap(), 0),
        value_type,
        value,
        timestamp: now(),
        display_name: "Meter".to_string(),
    }
}

#[tokio::test]
async fn should_not_report_change_when_same_double_is_recorded_twice() {
    let mut s = stack().await;
    let power = PropertyValue::Double(1.071_566_039_146_582_6e-75);

    s.updaters
        .record(&reading_of(DevicePropertyValueType::Power, power))
        .await
        .unwrap();
    drain(&mut s.events);
    s.updaters
        .record(&reading_of(DevicePropertyValueType::Power, power))
        .await
        .unwrap();

    let names: Vec<_> = drain(&mut s.events).iter().map(Event::name).collect();
    assert_eq!(names, vec!["value_updated"]);
}

#[tokio::test]
async fn should_keep_accepting_values_after_non_finite_reading_is_refused() {
    let mut s = stack().await;

    let result = s
        .updaters
        .record(&reading_of(
            DevicePropertyValueType::Temperature,
            PropertyValue::Float(f32::NAN),
        ))
        .await;
    assert!(matches!(result, Err(PropStateError::Storage(_))));
    let names: Vec<_> = drain(&mut s.events).iter().map(Event::name).collect();
    assert_eq!(names, vec!["property_created"]);

    s.updaters
        .record(&reading_of(
            DevicePropertyValueType::Temperature,
            PropertyValue::Float(21.5),
        ))
        .await
        .unwrap();
    let events = drain(&mut s.events);
    let names: Vec<_> = events.iter().map(Event::name).collect();
    assert_eq!(names, vec!["value_updated", "value_changed"]);
    assert!(value_payload(&events[1]).previous.is_none());
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_chain_previous_values_under_concurrent_writers() {
    let Stack {
        _db,
        updaters,
        mut events,
    } = stack().await;
    let updaters = Arc::new(updaters);
    let property = DevicePropertyId::new(DeviceId::new("meter", "shellyem").unwrap(), 1);

    let tasks: Vec<_> = (0..20_u32)
        .map(|n| {
            let updaters = Arc::clone(&updaters);
            let property = property.clone();
            tokio::spawn(async move {
                let reading = Reading {
                    property_id: property,
                    value_type: DevicePropertyValueType::Power,
                    value: PropertyValue::Double(f64::from(n % 4) * 100.0),
                    timestamp: now(),
                    display_name: "Meter".to_string(),
                };
                updaters.record(&reading).await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let all = drain(&mut events);
    assert_eq!(all.iter().filter(|e| e.name() == "property_created").count(), 1);

    let updated: Vec<_> = all
        .iter()
        .filter(|e| e.name() == "value_updated")
        .map(value_payload)
        .collect();
    assert_eq!(updated.len(), 20);
    assert!(updated[0].previous.is_none());
    let mut expected_changes = 1;
    for pair in updated.windows(2) {
        assert_eq!(pair[1].previous, Some(pair[0].current));
        if !pair[0].current.value.same_value(&pair[1].current.value) {
            expected_changes += 1;
        }
    }
    let changed = all.iter().filter(|e| e.name() == "value_changed").count();
    assert_eq!(changed, expected_changes);
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_serialise_events_as_tagged_json() {
    let mut s = stack().await;
    s.updaters.record(&relay_reading(true, now())).await.unwrap();

    let events = drain(&mut s.events);
    let json = serde_json::to_value(&events[2]).unwrap();

    assert_eq!(json["type"], "value_changed");
    assert_eq!(json["data"]["property_id"], "shelly1:abc/0");
    assert_eq!(json["data"]["value_type"], "relay_state");
    assert_eq!(json["data"]["current"]["value"]["kind"], "boolean");
    assert_eq!(json["data"]["current"]["value"]["value"], true);
    assert!(json["data"]["previous"].is_null());

    let back: Event = serde_json::from_value(json).unwrap();
    assert_eq!(back, events[2]);
}
