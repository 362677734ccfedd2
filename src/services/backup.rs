// SPDX-License-Identifier: MIT

//! Backup export/import.
//!
//! The file format is a single JSON document
//! `{ "activities": [...], "viewOptions": {...} }`. Import validates the
//! whole payload before applying anything: a corrupt file never leaves
//! partial state behind. Imported activities are re-created through the
//! sync adapter, so ids are reassigned by the remote store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::db::ActivityStore;
use crate::error::{AppError, Result};
use crate::models::{Activity, NewActivity, ViewOptions};
use crate::registry::ActivityRegistry;
use crate::services::sync::SyncService;
use crate::time_utils;

/// Concurrent create limit during import, mirroring the remote store's
/// batch headroom.
const MAX_CONCURRENT_IMPORTS: usize = 8;

/// On-disk backup document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub activities: ActivitiesField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_options: Option<ViewOptions>,
}

/// Older exports wrote the raw id-keyed map; newer ones write a list.
/// Both are accepted.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivitiesField {
    List(Vec<Activity>),
    Map(BTreeMap<String, Activity>),
}

impl ActivitiesField {
    pub fn into_vec(self) -> Vec<Activity> {
        match self {
            ActivitiesField::List(list) => list,
            ActivitiesField::Map(map) => map
                .into_iter()
                .map(|(key, mut activity)| {
                    if activity.id.is_empty() {
                        activity.id = key;
                    }
                    activity
                })
                .collect(),
        }
    }
}

/// Conventional backup file name for a given day.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("activity-logger-backup-{}.json", time_utils::format_date(date))
}

/// Serialize the registry (and optionally view options) to the backup
/// format.
pub fn export_to_string(
    registry: &ActivityRegistry,
    view_options: Option<ViewOptions>,
) -> Result<String> {
    let document = BackupDocument {
        activities: ActivitiesField::List(registry.all()),
        view_options,
    };
    serde_json::to_string_pretty(&document).map_err(|e| AppError::Internal(e.into()))
}

/// Write a backup file and return its path.
pub fn export_to_file(
    dir: &Path,
    registry: &ActivityRegistry,
    view_options: Option<ViewOptions>,
) -> Result<PathBuf> {
    let data = export_to_string(registry, view_options)?;
    let path = dir.join(backup_file_name(time_utils::today_utc()));

    std::fs::create_dir_all(dir)
        .and_then(|_| std::fs::write(&path, data))
        .map_err(|e| AppError::Storage(format!("Failed to write backup {}: {}", path.display(), e)))?;

    tracing::info!(path = %path.display(), "Backup exported");
    Ok(path)
}

/// Parsed and validated import payload, ready to apply.
#[derive(Debug)]
pub struct ImportPayload {
    pub activities: Vec<NewActivity>,
    pub view_options: Option<ViewOptions>,
}

/// Parse an import file. Malformed JSON or an invalid activity rejects
/// the whole payload; nothing is applied.
pub fn parse_import(data: &str) -> Result<ImportPayload> {
    let document: BackupDocument =
        serde_json::from_str(data).map_err(|e| AppError::ImportParse(e.to_string()))?;

    let activities: Vec<NewActivity> = document
        .activities
        .into_vec()
        .iter()
        .map(NewActivity::from)
        .collect();

    for activity in &activities {
        activity.validate().map_err(|e| {
            AppError::ImportParse(format!("invalid activity '{}': {}", activity.name, e))
        })?;
    }

    Ok(ImportPayload {
        activities,
        view_options: document.view_options,
    })
}

/// Re-create the payload's activities through the sync adapter.
///
/// Ids are reassigned by the remote store. Returns the number of
/// activities created; a remote write failure aborts the remainder.
pub async fn import_activities<S: ActivityStore>(
    sync: &SyncService<S>,
    payload: ImportPayload,
) -> Result<usize> {
    let results: Vec<Result<String>> = stream::iter(payload.activities)
        .map(|activity| {
            let sync = sync.clone();
            async move { sync.create(activity).await }
        })
        .buffer_unordered(MAX_CONCURRENT_IMPORTS)
        .collect()
        .await;

    let mut created = 0;
    for result in results {
        result?;
        created += 1;
    }

    tracing::info!(created, "Import complete");
    Ok(created)
}
