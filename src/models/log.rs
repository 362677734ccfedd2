// SPDX-License-Identifier: MIT

//! Append-only completion log records.
//!
//! Stored in the `logs` collection, ordered by timestamp descending. The
//! feed is an audit trail; per-day completion state lives in the owning
//! activity's entries map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::metric::MetricScalar;

/// One logged completion event.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Document id, assigned by the remote store on creation.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub activity_id: String,
    #[serde(default)]
    pub activity_name: String,
    /// `yyyy-MM-dd` calendar date the completion applies to.
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<String, MetricScalar>>,
    /// RFC3339 instant, stamped by the sync adapter.
    #[serde(default)]
    pub timestamp: String,
}
