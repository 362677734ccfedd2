// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use activity_logger::db::{ActivityStore, FirestoreDb, MemoryStore};
use activity_logger::error::Result;
use activity_logger::models::{Activity, LogRecord, NewActivity};
use activity_logger::registry::ActivityRegistry;
use activity_logger::services::SyncService;
use serde_json::Value;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Build a sync service over a fresh in-memory store.
#[allow(dead_code)]
pub fn test_sync() -> (MemoryStore, SyncService<MemoryStore>, Arc<ActivityRegistry>) {
    let store = MemoryStore::new();
    let registry = Arc::new(ActivityRegistry::new());
    let sync = SyncService::new(store.clone(), Arc::clone(&registry), Duration::from_secs(60));
    (store, sync, registry)
}

/// A well-formed create payload.
#[allow(dead_code)]
pub fn new_activity(name: &str) -> NewActivity {
    NewActivity {
        name: name.to_string(),
        category: "Health".to_string(),
        color: "#1B4965".to_string(),
        icon: "📖".to_string(),
        ..Default::default()
    }
}

/// Store whose snapshot reads can be frozen to an empty view while writes
/// keep landing, simulating a listener that lags behind local writes.
#[derive(Clone)]
#[allow(dead_code)]
pub struct StaleStore {
    pub inner: MemoryStore,
    stale: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl StaleStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            stale: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_stale(&self, stale: bool) {
        self.stale.store(stale, Ordering::SeqCst);
    }
}

impl ActivityStore for StaleStore {
    async fn list_activities(&self) -> Result<Vec<Activity>> {
        if self.stale.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        self.inner.list_activities().await
    }

    async fn create_activity(&self, doc: Value) -> Result<String> {
        self.inner.create_activity(doc).await
    }

    async fn update_activity(&self, id: &str, patch: Value) -> Result<()> {
        self.inner.update_activity(id, patch).await
    }

    async fn delete_activity(&self, id: &str) -> Result<()> {
        self.inner.delete_activity(id).await
    }

    async fn list_logs(&self) -> Result<Vec<LogRecord>> {
        if self.stale.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        self.inner.list_logs().await
    }

    async fn create_log(&self, doc: Value) -> Result<String> {
        self.inner.create_log(doc).await
    }
}
