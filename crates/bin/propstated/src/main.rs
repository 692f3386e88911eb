//! # propstated — propstate daemon
//!
//! Composition root that wires all adapters together and runs the
//! value-update pipeline.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Initialise the `SQLite` connection pool and run migrations
//! - Construct repositories, the event bus and the value updaters
//! - Log every published event
//! - Drive the virtual integration until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use propstate_adapter_storage_sqlite_sqlx::{
    Config as StorageConfig, SqlitePropertyRepository, SqliteValueRepository,
};
use propstate_adapter_virtual::VirtualIntegration;
use propstate_app::event_bus::InProcessEventBus;
use propstate_app::services::value_update_service::ValueUpdateContext;
use propstate_app::services::value_updaters::ValueUpdaters;
use propstate_domain::event::{Event, ValueEventKind};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let filter =
        EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(config.event_bus.capacity));
    let event_log = tokio::spawn(log_events(event_bus.subscribe()));

    // Services
    let ctx = ValueUpdateContext::new(
        SqlitePropertyRepository::new(pool.clone()),
        SqliteValueRepository::new(pool),
        Arc::clone(&event_bus),
    );
    let updaters = ValueUpdaters::new(&ctx);
    tracing::info!(value_types = updaters.len(), "propstated started");

    if config.integrations.virtual_enabled {
        let integration = VirtualIntegration::new()?;
        tokio::select! {
            () = integration.run(&updaters, config.virtual_interval()) => {}
            signal = tokio::signal::ctrl_c() => signal?,
        }
    } else {
        tracing::info!("no integration enabled, waiting for shutdown");
        tokio::signal::ctrl_c().await?;
    }

    tracing::info!("shutting down");
    event_log.abort();
    db.close().await;
    Ok(())
}

/// Write every bus event to the log until the bus is dropped.
async fn log_events(receiver: broadcast::Receiver<Event>) {
    let mut stream = BroadcastStream::new(receiver);
    while let Some(item) = stream.next().await {
        match item {
            Ok(event) => log_event(&event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event log lagging, events lost");
            }
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::PropertyCreated(e) | Event::PropertyDeleted(e) => {
            tracing::info!(
                event = event.name(),
                property_id = %e.property_id,
                property_type = %e.property_type,
                "property lifecycle"
            );
        }
        Event::ValueUpdated(e) | Event::ValueChanged(e) => {
            let args = e.message_args.join(", ");
            if event.value_event_kind() == Some(ValueEventKind::Changed) {
                tracing::info!(
                    property_id = %e.property_id,
                    value_type = %e.value_type,
                    message = %e.message_key,
                    %args,
                    "value changed"
                );
            } else {
                tracing::debug!(
                    property_id = %e.property_id,
                    value_type = %e.value_type,
                    message = %e.message_key,
                    %args,
                    "value updated"
                );
            }
        }
    }
}
