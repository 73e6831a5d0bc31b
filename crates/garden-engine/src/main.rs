//! Garden engine binary for the Chao Garden lifecycle engine.
//!
//! Wires the persistence gateway to the decay scheduler and runs until
//! interrupted. The chat-platform command surface is a separate process
//! layer that drives [`garden_core::GardenKeeper`] against the same
//! database; this binary owns the time-based side of the simulation.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `garden-config.yaml`
//! 3. Connect to `PostgreSQL` and run migrations
//! 4. Build the gateway stores and scheduler control
//! 5. Spawn the decay scheduler loop
//! 6. Wait for ctrl-c, stop the scheduler gracefully, close the pool

mod error;

use std::path::Path;
use std::sync::Arc;

use garden_core::{SchedulerControl, TracingNotifier};
use garden_db::{PgInventoryStore, PgPetStore, PostgresPool};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file path, relative to the working directory.
const CONFIG_PATH: &str = "garden-config.yaml";

/// Application entry point for the garden engine.
///
/// # Errors
///
/// Returns an error if any initialization step fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("garden-engine starting");

    // 2. Load configuration (defaults if the file is absent).
    let config_path = Path::new(CONFIG_PATH);
    let config = if config_path.exists() {
        garden_core::config::load_config(config_path).map_err(EngineError::from)?
    } else {
        warn!(path = CONFIG_PATH, "Config file not found; using defaults");
        garden_core::GardenConfig::default()
    };
    info!(
        garden = %config.garden.name,
        pass_interval_secs = config.scheduler.pass_interval_secs,
        "Configuration loaded"
    );

    // 3. Connect to PostgreSQL and run migrations.
    let pool = PostgresPool::connect_url(&config.infrastructure.database_url)
        .await
        .map_err(EngineError::from)?;
    pool.run_migrations().await.map_err(EngineError::from)?;

    // 4. Build the gateway stores and scheduler control.
    let pets = Arc::new(PgPetStore::new(&pool));
    let inventories = Arc::new(PgInventoryStore::new(&pool));
    let notifier = Arc::new(TracingNotifier::new());
    let control = Arc::new(SchedulerControl::new(config.scheduler.pass_interval_secs));

    // 5. Spawn the decay scheduler loop.
    let scheduler_handle = tokio::spawn(garden_core::run_decay_loop(
        pets,
        inventories,
        notifier,
        Arc::clone(&control),
        config.decay,
        config.lifecycle.clone(),
    ));
    info!("Decay scheduler running");

    // 6. Wait for ctrl-c, then stop gracefully.
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "Failed to listen for shutdown signal; stopping");
    }
    info!("Shutdown signal received; stopping scheduler");
    control.request_stop();

    let result = scheduler_handle.await.map_err(|e| EngineError::Scheduler {
        message: format!("{e}"),
    })?;
    info!(passes = result.passes, "Scheduler drained");

    pool.close().await;
    info!("garden-engine stopped");
    Ok(())
}
