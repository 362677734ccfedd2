// SPDX-License-Identifier: MIT

//! In-memory authoritative cache of activities and the completion log feed.
//!
//! The sync adapter is the sole writer of authoritative contents: every
//! snapshot replaces the map wholesale via [`ActivityRegistry::replace_all`].
//! Presentation code reads through [`ActivityRegistry::get`]/[`ActivityRegistry::all`]
//! and observes changes through the revision channel; it never mutates the
//! map directly.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use tokio::sync::watch;

use crate::models::{Activity, LogRecord};

/// Shared activity cache keyed by document id.
pub struct ActivityRegistry {
    activities: RwLock<HashMap<String, Activity>>,
    logs: RwLock<Vec<LogRecord>>,
    revision: watch::Sender<u64>,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            activities: RwLock::new(HashMap::new()),
            logs: RwLock::new(Vec::new()),
            revision,
        }
    }

    /// Replace the whole map with a snapshot. Never a partial merge:
    /// activities absent from the snapshot disappear.
    pub fn replace_all(&self, activities: Vec<Activity>) {
        let map: HashMap<String, Activity> = activities
            .into_iter()
            .map(|activity| (activity.id.clone(), activity))
            .collect();

        *self.activities.write().expect("registry lock poisoned") = map;
        self.bump();
    }

    /// Look up an activity. Absent is not an error; callers must handle a
    /// missing activity (e.g. a concurrent delete from another session).
    pub fn get(&self, id: &str) -> Option<Activity> {
        self.activities
            .read()
            .expect("registry lock poisoned")
            .get(id)
            .cloned()
    }

    /// Merge a partial update into the cached activity for immediate
    /// feedback. Fields absent from the partial are preserved; an unknown
    /// id inserts a new entry (optimistic create).
    ///
    /// A partial that does not produce a deserializable activity is
    /// dropped with a warning; the next snapshot restores consistency.
    pub fn apply_optimistic(&self, id: &str, partial: &Value) {
        let mut guard = self.activities.write().expect("registry lock poisoned");

        let mut base = match guard.get(id) {
            Some(existing) => match serde_json::to_value(existing) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(id, error = %e, "Skipping optimistic update");
                    return;
                }
            },
            None => Value::Object(serde_json::Map::new()),
        };

        merge_value(&mut base, partial);

        match serde_json::from_value::<Activity>(base) {
            Ok(mut merged) => {
                merged.id = id.to_string();
                guard.insert(id.to_string(), merged);
                drop(guard);
                self.bump();
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Dropping malformed optimistic update");
            }
        }
    }

    /// Drop a single activity (optimistic delete).
    pub fn remove(&self, id: &str) {
        let removed = self
            .activities
            .write()
            .expect("registry lock poisoned")
            .remove(id)
            .is_some();
        if removed {
            self.bump();
        }
    }

    /// All activities, newest first (creation time descending by
    /// convention; ordering is presentational, not a correctness
    /// requirement).
    pub fn all(&self) -> Vec<Activity> {
        let mut activities: Vec<Activity> = self
            .activities
            .read()
            .expect("registry lock poisoned")
            .values()
            .cloned()
            .collect();
        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        activities
    }

    pub fn len(&self) -> usize {
        self.activities
            .read()
            .expect("registry lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the completion log feed with a snapshot.
    pub fn replace_logs(&self, logs: Vec<LogRecord>) {
        *self.logs.write().expect("registry lock poisoned") = logs;
        self.bump();
    }

    /// Append one log record (optimistic add after a confirmed write).
    pub fn push_log(&self, record: LogRecord) {
        self.logs
            .write()
            .expect("registry lock poisoned")
            .push(record);
        self.bump();
    }

    pub fn logs(&self) -> Vec<LogRecord> {
        self.logs.read().expect("registry lock poisoned").clone()
    }

    /// Observe mutations. The receiver yields a change notification for
    /// every registry write (observer fan-out; replaces UI re-render
    /// subscriptions).
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

impl Default for ActivityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep JSON merge: object fields merge recursively, everything else is
/// replaced by the patch.
pub(crate) fn merge_value(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                merge_value(
                    base_map.entry(key.clone()).or_insert(Value::Null),
                    patch_value,
                );
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}
