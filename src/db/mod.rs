// SPDX-License-Identifier: MIT

//! Remote document store layer.
//!
//! [`ActivityStore`] is the seam between the sync adapter and whatever
//! holds the documents: Firestore in production, the in-memory store for
//! offline mode and tests. Implementations return activities with the
//! `id` field set to the authoritative document id.

use std::future::Future;

use serde_json::Value;

use crate::error::Result;
use crate::models::{Activity, LogRecord};

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

/// Collection names as constants.
pub mod collections {
    pub const ACTIVITIES: &str = "activities";
    pub const LOGS: &str = "logs";
}

/// Remote collection operations the sync adapter consumes.
///
/// Errors map to [`crate::error::AppError::RemoteRead`] for snapshot reads
/// and [`crate::error::AppError::RemoteWrite`] for mutations.
pub trait ActivityStore: Clone + Send + Sync + 'static {
    /// Full snapshot of the activities collection, creation time
    /// descending.
    fn list_activities(&self) -> impl Future<Output = Result<Vec<Activity>>> + Send;

    /// Create a document and return the store-assigned id. The payload
    /// carries no id field; the caller persists the id afterwards.
    fn create_activity(&self, doc: Value) -> impl Future<Output = Result<String>> + Send;

    /// Patch the listed top-level fields of a document.
    fn update_activity(&self, id: &str, patch: Value) -> impl Future<Output = Result<()>> + Send;

    /// Delete a document. On failure the document is assumed still
    /// present.
    fn delete_activity(&self, id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Full snapshot of the completion log feed, timestamp descending.
    fn list_logs(&self) -> impl Future<Output = Result<Vec<LogRecord>>> + Send;

    /// Append a completion log record, returning the store-assigned id.
    fn create_log(&self, doc: Value) -> impl Future<Output = Result<String>> + Send;
}
