// SPDX-License-Identifier: MIT

//! Local persistence of view preferences.
//!
//! Preferences live in a single JSON file (`viewOptions.json`) in the
//! data directory: read once at startup, written on every update. They
//! are device state, fully independent of the synced activity data.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::{ViewOptions, ViewOptionsUpdate};

const VIEW_OPTIONS_FILE: &str = "viewOptions.json";

/// Device-local view options store.
pub struct ViewOptionsStore {
    path: PathBuf,
    current: RwLock<ViewOptions>,
}

impl ViewOptionsStore {
    /// Load stored options, falling back to defaults when the file is
    /// missing or unreadable (corrupt local state never blocks startup).
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(VIEW_OPTIONS_FILE);

        let current = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(options) => options,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Resetting corrupt view options");
                    ViewOptions::default()
                }
            },
            Err(_) => ViewOptions::default(),
        };

        Self {
            path,
            current: RwLock::new(current),
        }
    }

    /// Current options snapshot.
    pub fn get(&self) -> ViewOptions {
        self.current.read().expect("prefs lock poisoned").clone()
    }

    /// Merge a partial update and persist the result.
    pub fn update(&self, update: ViewOptionsUpdate) -> Result<ViewOptions> {
        let merged = {
            let mut guard = self.current.write().expect("prefs lock poisoned");
            guard.apply(update);
            guard.clone()
        };

        let raw = serde_json::to_string_pretty(&merged).map_err(|e| AppError::Internal(e.into()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(&self.path, raw).map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GridDensity;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ViewOptionsStore::load(dir.path());
        assert_eq!(store.get(), ViewOptions::default());
    }

    #[test]
    fn test_update_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = ViewOptionsStore::load(dir.path());

        store
            .update(ViewOptionsUpdate {
                dark_mode: Some(true),
                grid_density: Some(GridDensity::Compact),
                ..Default::default()
            })
            .unwrap();

        let reloaded = ViewOptionsStore::load(dir.path());
        assert!(reloaded.get().dark_mode);
        assert_eq!(reloaded.get().grid_density, GridDensity::Compact);
        // untouched fields survive
        assert!(reloaded.get().show_weekends);
    }

    #[test]
    fn test_corrupt_file_resets_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VIEW_OPTIONS_FILE), "{ nope").unwrap();

        let store = ViewOptionsStore::load(dir.path());
        assert_eq!(store.get(), ViewOptions::default());
    }
}
