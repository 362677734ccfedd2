// SPDX-License-Identifier: MIT

//! Activity-Logger sync daemon.
//!
//! Wires config, the document store, and the sync loop together, then
//! runs until interrupted. Presentation layers consume the registry and
//! status channel through the library API.

use std::sync::Arc;
use std::time::Duration;

use activity_logger::config::Config;
use activity_logger::db::{ActivityStore, FirestoreDb, MemoryStore};
use activity_logger::prefs::ViewOptionsStore;
use activity_logger::registry::ActivityRegistry;
use activity_logger::services::{SyncPhase, SyncService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        data_dir = %config.data_dir.display(),
        offline = config.offline,
        "Starting Activity-Logger sync"
    );

    // Load device-local view preferences
    let prefs = ViewOptionsStore::load(&config.data_dir);
    tracing::info!(options = ?prefs.get(), "View options loaded");

    if config.offline {
        run(MemoryStore::new(), config).await
    } else {
        let db = FirestoreDb::new(&config.gcp_project_id)
            .await
            .expect("Failed to connect to Firestore");
        run(db, config).await
    }
}

async fn run<S: ActivityStore>(store: S, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(ActivityRegistry::new());
    let sync = SyncService::new(
        store,
        Arc::clone(&registry),
        Duration::from_secs(config.poll_interval_secs),
    );

    let task = sync.spawn();

    // Report once the first snapshot lands
    let mut status = sync.status();
    tokio::spawn({
        let registry = Arc::clone(&registry);
        async move {
            while status.changed().await.is_ok() {
                let phase = status.borrow().phase;
                if phase == SyncPhase::Live {
                    tracing::info!(activities = registry.len(), "Initial snapshot applied");
                    break;
                }
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    sync.close();
    task.await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("activity_logger=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
