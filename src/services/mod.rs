// SPDX-License-Identifier: MIT

//! Services module - sync and backup workflows.

pub mod backup;
pub mod sync;

pub use backup::{export_to_file, export_to_string, import_activities, parse_import};
pub use sync::{SyncPhase, SyncService, SyncStatus};
