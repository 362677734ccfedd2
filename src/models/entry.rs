// SPDX-License-Identifier: MIT

//! Daily completion entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::metric::{MetricScalar, MetricValue};

/// One day's logged outcome for an activity.
///
/// Keyed by `yyyy-MM-dd` date string inside the owning activity; exactly
/// one entry exists per (activity, calendar date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default)]
    pub completed: bool,
    /// RFC3339 creation/modification instant.
    #[serde(default)]
    pub timestamp: String,
    /// Metric name to logged value. Keys should reference names in the
    /// owning activity's metric templates, but unknown names are tolerated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<String, MetricScalar>>,
}

impl Entry {
    /// A bare completion marker with no metrics.
    pub fn completion(completed: bool, timestamp: String) -> Self {
        Self {
            completed,
            timestamp,
            metrics: None,
        }
    }

    /// Build a completed entry, folding metric values into the metrics map.
    ///
    /// Empty values are stripped; an entry logged with no usable values
    /// carries no metrics map at all.
    pub fn from_values(timestamp: String, values: &[MetricValue]) -> Self {
        let metrics: BTreeMap<String, MetricScalar> = values
            .iter()
            .filter(|v| !v.value.is_empty())
            .map(|v| (v.name.clone(), v.value.clone()))
            .collect();

        Self {
            completed: true,
            timestamp,
            metrics: if metrics.is_empty() {
                None
            } else {
                Some(metrics)
            },
        }
    }
}
