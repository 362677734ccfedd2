// SPDX-License-Identifier: MIT

//! In-memory document store for offline mode and tests.
//!
//! Mirrors the remote collection contract: store-assigned ids, full
//! snapshots ordered by creation time descending, and top-level field
//! patches. Write failures can be injected to exercise error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::db::ActivityStore;
use crate::error::{AppError, Result};
use crate::models::{Activity, LogRecord};

#[derive(Default)]
struct Collections {
    activities: HashMap<String, Value>,
    logs: HashMap<String, Value>,
}

/// Offline document store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Collections>>,
    next_id: Arc<AtomicU64>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a transport error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored activity documents.
    pub async fn activity_count(&self) -> usize {
        self.inner.lock().await.activities.len()
    }

    fn next_doc_id(&self) -> String {
        format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::RemoteWrite("injected write failure".to_string()));
        }
        Ok(())
    }
}

fn sort_key(doc: &Value, field: &str) -> String {
    doc.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl ActivityStore for MemoryStore {
    async fn list_activities(&self) -> Result<Vec<Activity>> {
        let guard = self.inner.lock().await;
        let mut docs: Vec<(String, Value)> = guard
            .activities
            .iter()
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect();
        drop(guard);

        docs.sort_by(|a, b| sort_key(&b.1, "createdAt").cmp(&sort_key(&a.1, "createdAt")));

        let mut out = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            let mut activity: Activity = serde_json::from_value(doc)
                .map_err(|e| AppError::RemoteRead(format!("malformed document {}: {}", id, e)))?;
            activity.id = id;
            out.push(activity);
        }
        Ok(out)
    }

    async fn create_activity(&self, doc: Value) -> Result<String> {
        self.check_writable()?;
        let id = self.next_doc_id();
        self.inner.lock().await.activities.insert(id.clone(), doc);
        Ok(id)
    }

    async fn update_activity(&self, id: &str, patch: Value) -> Result<()> {
        self.check_writable()?;
        let mut guard = self.inner.lock().await;
        let doc = guard
            .activities
            .get_mut(id)
            .ok_or_else(|| AppError::RemoteWrite(format!("no such document: {}", id)))?;

        // Firestore patch semantics: listed top-level fields are replaced.
        if let (Value::Object(doc_map), Value::Object(patch_map)) = (doc, &patch) {
            for (key, value) in patch_map {
                doc_map.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete_activity(&self, id: &str) -> Result<()> {
        self.check_writable()?;
        self.inner.lock().await.activities.remove(id);
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<LogRecord>> {
        let guard = self.inner.lock().await;
        let mut docs: Vec<(String, Value)> = guard
            .logs
            .iter()
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect();
        drop(guard);

        docs.sort_by(|a, b| sort_key(&b.1, "timestamp").cmp(&sort_key(&a.1, "timestamp")));

        let mut out = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            let mut record: LogRecord = serde_json::from_value(doc)
                .map_err(|e| AppError::RemoteRead(format!("malformed log {}: {}", id, e)))?;
            record.id = id;
            out.push(record);
        }
        Ok(out)
    }

    async fn create_log(&self, doc: Value) -> Result<String> {
        self.check_writable()?;
        let id = self.next_doc_id();
        self.inner.lock().await.logs.insert(id.clone(), doc);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = store
            .create_activity(json!({ "name": "Read", "createdAt": "2024-01-01T00:00:00Z" }))
            .await
            .unwrap();
        let b = store
            .create_activity(json!({ "name": "Run", "createdAt": "2024-01-02T00:00:00Z" }))
            .await
            .unwrap();
        assert_ne!(a, b);

        let listed = store.list_activities().await.unwrap();
        assert_eq!(listed.len(), 2);
        // creation time descending
        assert_eq!(listed[0].name, "Run");
        assert_eq!(listed[1].id, a);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_a_write_error() {
        let store = MemoryStore::new();
        let err = store
            .update_activity("missing", json!({ "name": "x" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RemoteWrite(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_listed_fields_only() {
        let store = MemoryStore::new();
        let id = store
            .create_activity(json!({ "name": "Read", "color": "#1B4965" }))
            .await
            .unwrap();

        store
            .update_activity(&id, json!({ "name": "Read More" }))
            .await
            .unwrap();

        let listed = store.list_activities().await.unwrap();
        assert_eq!(listed[0].name, "Read More");
        assert_eq!(listed[0].color, "#1B4965");
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let err = store.create_activity(json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::RemoteWrite(_)));

        store.set_fail_writes(false);
        assert!(store.create_activity(json!({})).await.is_ok());
    }
}
