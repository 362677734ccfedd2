// SPDX-License-Identifier: MIT

//! Remote sync adapter.
//!
//! Bridges the activity registry to the remote collections. A background
//! poll loop delivers full snapshots that replace the registry wholesale;
//! writes go remote-first, then apply an optimistic local update so the
//! caller sees the change before the next snapshot confirms it.
//!
//! A write and a snapshot can interleave in any order, so the adapter
//! never assumes its own pending write is reflected in the next snapshot.
//! Optimistic state is a UI convenience only; any confirmed snapshot
//! overwrites any pending entry for the same id.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use dashmap::DashMap;
use serde_json::{json, Value};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::db::ActivityStore;
use crate::error::{AppError, Result};
use crate::models::entry::Entry;
use crate::models::{metric, Activity, LogRecord, MetricValue, NewActivity};
use crate::registry::{merge_value, ActivityRegistry};
use crate::time_utils;

/// Subscription lifecycle. Loading is asserted until the first snapshot
/// (even an empty one) arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Uninitialized,
    Subscribing,
    Live,
    Closed,
}

/// Shared sync state, observable through a watch channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    /// Most recent remote error, cleared by the next successful snapshot.
    pub last_error: Option<String>,
}

impl SyncStatus {
    /// Whether the initial snapshot is still outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SyncPhase::Uninitialized | SyncPhase::Subscribing)
    }
}

/// Sync adapter over an injectable document store.
pub struct SyncService<S: ActivityStore> {
    store: S,
    registry: Arc<ActivityRegistry>,
    /// Optimistically created activities not yet confirmed by a snapshot.
    pending: Arc<DashMap<String, Activity>>,
    status: Arc<watch::Sender<SyncStatus>>,
    shutdown: Arc<watch::Sender<bool>>,
    poll_interval: Duration,
}

impl<S: ActivityStore> Clone for SyncService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            registry: Arc::clone(&self.registry),
            pending: Arc::clone(&self.pending),
            status: Arc::clone(&self.status),
            shutdown: Arc::clone(&self.shutdown),
            poll_interval: self.poll_interval,
        }
    }
}

impl<S: ActivityStore> SyncService<S> {
    pub fn new(store: S, registry: Arc<ActivityRegistry>, poll_interval: Duration) -> Self {
        let (status, _) = watch::channel(SyncStatus {
            phase: SyncPhase::Uninitialized,
            last_error: None,
        });
        let (shutdown, _) = watch::channel(false);

        Self {
            store,
            registry,
            pending: Arc::new(DashMap::new()),
            status: Arc::new(status),
            shutdown: Arc::new(shutdown),
            poll_interval,
        }
    }

    /// Spawn the snapshot poll loop. Runs until [`SyncService::close`].
    pub fn spawn(&self) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move { service.run().await })
    }

    async fn run(&self) {
        self.set_phase(SyncPhase::Subscribing);
        tracing::info!(interval = ?self.poll_interval, "Snapshot subscription started");

        let mut shutdown = self.shutdown.subscribe();
        let mut ticker = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    // Read errors are recorded but never fatal: the loop is
                    // the retry policy.
                    if let Err(e) = self.refresh().await {
                        tracing::warn!(error = %e, "Snapshot poll failed");
                    }
                }
            }
        }

        self.set_phase(SyncPhase::Closed);
        tracing::info!("Snapshot subscription closed");
    }

    /// Fetch one snapshot of both collections and apply it.
    ///
    /// Also the caller-facing recovery path: after a failed write, a
    /// refresh restores the canonical remote state.
    pub async fn refresh(&self) -> Result<()> {
        let snapshot = match self.store.list_activities().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.record_error(&e);
                return Err(e);
            }
        };

        let pending: Vec<Activity> = self.pending.iter().map(|e| e.value().clone()).collect();
        let (merged, confirmed) = reconcile(snapshot, &pending);
        for id in confirmed {
            self.pending.remove(&id);
        }
        self.registry.replace_all(merged);

        // The log feed is best-effort: a failure here leaves the previous
        // feed in place but still counts as a live snapshot.
        match self.store.list_logs().await {
            Ok(logs) => self.registry.replace_logs(logs),
            Err(e) => tracing::warn!(error = %e, "Log feed poll failed"),
        }

        self.status.send_modify(|s| {
            s.phase = SyncPhase::Live;
            s.last_error = None;
        });
        Ok(())
    }

    /// Create an activity remotely and mirror it locally.
    ///
    /// Any client-supplied id is discarded; the store assigns one, and a
    /// follow-up update persists it into the document body so reads of
    /// `activity.id` agree with the map key. On failure the registry is
    /// not mutated.
    pub async fn create(&self, activity: NewActivity) -> Result<String> {
        activity.validate()?;

        let created_at = time_utils::now_rfc3339();
        let mut doc = serde_json::to_value(&activity).map_err(|e| AppError::Internal(e.into()))?;
        if let Some(map) = doc.as_object_mut() {
            map.remove("id");
            map.insert("createdAt".to_string(), json!(created_at));
        }

        let id = match self.store.create_activity(doc).await {
            Ok(id) => id,
            Err(e) => {
                self.record_error(&e);
                return Err(e);
            }
        };

        // Two separate remote calls: a document can observably exist
        // without its id field until this lands.
        if let Err(e) = self
            .store
            .update_activity(&id, json!({ "id": id.clone() }))
            .await
        {
            self.record_error(&e);
            return Err(e);
        }

        let stored = activity.into_activity(id.clone(), created_at);
        self.pending.insert(id.clone(), stored.clone());
        match serde_json::to_value(&stored) {
            Ok(value) => self.registry.apply_optimistic(&id, &value),
            Err(e) => tracing::warn!(id, error = %e, "Optimistic insert skipped"),
        }

        tracing::info!(id, name = %stored.name, "Activity created");
        Ok(id)
    }

    /// Patch an activity. The id is immutable and empty placeholder
    /// values are stripped so they never overwrite remote fields.
    pub async fn update(&self, id: &str, updates: Value) -> Result<()> {
        let patch = clean_patch(updates);
        let is_empty = patch.as_object().map(|m| m.is_empty()).unwrap_or(true);
        if is_empty {
            return Ok(());
        }

        if let Err(e) = self.store.update_activity(id, patch.clone()).await {
            self.record_error(&e);
            return Err(e);
        }

        self.registry.apply_optimistic(id, &patch);
        if let Some(mut entry) = self.pending.get_mut(id) {
            if let Ok(mut base) = serde_json::to_value(entry.value()) {
                merge_value(&mut base, &patch);
                if let Ok(merged) = serde_json::from_value::<Activity>(base) {
                    *entry.value_mut() = merged;
                }
            }
        }
        Ok(())
    }

    /// Delete an activity and its entries (cascade). If the remote call
    /// fails the document is assumed still present and nothing changes
    /// locally.
    pub async fn remove(&self, id: &str) -> Result<()> {
        if let Err(e) = self.store.delete_activity(id).await {
            self.record_error(&e);
            return Err(e);
        }

        self.pending.remove(id);
        self.registry.remove(id);
        tracing::info!(id, "Activity deleted");
        Ok(())
    }

    /// Log a completion for a calendar date, folding metric values into
    /// the day's entry and appending to the completion feed.
    ///
    /// Required metrics are validated before anything is transmitted.
    pub async fn log_entry(
        &self,
        id: &str,
        date: NaiveDate,
        values: &[MetricValue],
    ) -> Result<()> {
        let activity = self
            .registry
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("activity {}", id)))?;

        metric::validate_required(&activity.metrics, values)?;

        let timestamp = time_utils::now_rfc3339();
        let entry = Entry::from_values(timestamp.clone(), values);
        let date_key = time_utils::format_date(date);

        let mut entries = activity.entries.clone();
        entries.insert(date_key.clone(), entry.clone());
        self.update(id, json!({ "entries": entries })).await?;

        // Completion feed append. Best-effort: entry state is already
        // durable, so a feed failure only costs the audit record.
        let record = LogRecord {
            id: String::new(),
            activity_id: id.to_string(),
            activity_name: activity.name.clone(),
            date: date_key,
            metrics: entry.metrics.clone(),
            timestamp,
        };
        if let Err(e) = self.add_log(record).await {
            tracing::warn!(id, error = %e, "Completion log append failed");
        }
        Ok(())
    }

    /// Set the completed flag for a date without metrics (the uncheck
    /// path, or a quick completion for activities with no templates).
    pub async fn set_completion(&self, id: &str, date: NaiveDate, completed: bool) -> Result<()> {
        let activity = self
            .registry
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("activity {}", id)))?;

        let entry = Entry::completion(completed, time_utils::now_rfc3339());
        let mut entries = activity.entries.clone();
        entries.insert(time_utils::format_date(date), entry);
        self.update(id, json!({ "entries": entries })).await
    }

    /// Append a record to the completion feed and mirror it locally.
    pub async fn add_log(&self, mut record: LogRecord) -> Result<()> {
        if record.timestamp.is_empty() {
            record.timestamp = time_utils::now_rfc3339();
        }

        let mut doc = serde_json::to_value(&record).map_err(|e| AppError::Internal(e.into()))?;
        if let Some(map) = doc.as_object_mut() {
            map.remove("id");
        }

        let id = match self.store.create_log(doc).await {
            Ok(id) => id,
            Err(e) => {
                self.record_error(&e);
                return Err(e);
            }
        };

        record.id = id;
        self.registry.push_log(record);
        Ok(())
    }

    /// Observe phase and error changes.
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    pub fn registry(&self) -> &Arc<ActivityRegistry> {
        &self.registry
    }

    /// Tear down the subscription. The poll loop exits and no further
    /// snapshots are applied.
    pub fn close(&self) {
        let _ = self.shutdown.send(true);
    }

    fn set_phase(&self, phase: SyncPhase) {
        self.status.send_modify(|s| s.phase = phase);
    }

    fn record_error(&self, error: &AppError) {
        self.status
            .send_modify(|s| s.last_error = Some(error.to_string()));
    }
}

/// Reconcile a confirmed snapshot with pending optimistic activities.
///
/// Rules:
/// - a snapshot document always wins over a pending entry with the same
///   id (last snapshot wins, no field-level merge across sessions);
/// - pending entries absent from the snapshot stay visible, so a freshly
///   created activity never flickers to "missing" while the remote index
///   catches up.
///
/// Returns the merged view plus the ids the snapshot confirmed.
pub(crate) fn reconcile(
    snapshot: Vec<Activity>,
    pending: &[Activity],
) -> (Vec<Activity>, Vec<String>) {
    let snapshot_ids: HashSet<&str> = snapshot
        .iter()
        .map(|activity| activity.id.as_str())
        .collect();

    let confirmed: Vec<String> = pending
        .iter()
        .filter(|activity| snapshot_ids.contains(activity.id.as_str()))
        .map(|activity| activity.id.clone())
        .collect();

    let unconfirmed: Vec<Activity> = pending
        .iter()
        .filter(|activity| !snapshot_ids.contains(activity.id.as_str()))
        .cloned()
        .collect();

    let mut merged = snapshot;
    merged.extend(unconfirmed);

    (merged, confirmed)
}

/// Strip immutable and placeholder fields from an update payload.
///
/// Removes the id and creation timestamp (immutable), plus null and
/// empty-string values recursively, so a sparse form submission never
/// blanks out remote fields.
pub(crate) fn clean_patch(mut updates: Value) -> Value {
    if let Some(map) = updates.as_object_mut() {
        map.remove("id");
        map.remove("createdAt");
    }
    clean_value(&mut updates);
    updates
}

fn clean_value(value: &mut Value) {
    if let Some(map) = value.as_object_mut() {
        map.retain(|_, v| !v.is_null() && v.as_str() != Some(""));
        for nested in map.values_mut() {
            clean_value(nested);
        }
    }
}
