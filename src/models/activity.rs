// SPDX-License-Identifier: MIT

//! Activity model for storage and sync.
//!
//! Documents live in the Firestore `activities` collection; field names on
//! the wire are camelCase. The document id doubles as the registry key and
//! is also persisted in the document body (the `id` field), so both reads
//! agree.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::entry::Entry;
use crate::models::metric::MetricTemplate;
use crate::time_utils;

/// Kind of trackable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Task,
    #[default]
    Habit,
    Goal,
}

/// Goal cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Completion goal attached to an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default)]
    pub frequency: Frequency,
    /// Completions per period. Always >= 1.
    #[serde(default = "default_target")]
    pub target: u32,
    /// Optional minutes per session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_per_session: Option<u32>,
}

fn default_target() -> u32 {
    1
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            frequency: Frequency::Daily,
            target: 1,
            time_per_session: None,
        }
    }
}

/// Stored activity record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Document id, assigned by the remote store on creation. The db layer
    /// overwrites this with the authoritative document id on every read.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    /// RGB hex, `#RRGGBB`.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default)]
    pub goal: Goal,
    /// Ordered metric templates.
    #[serde(default)]
    pub metrics: Vec<MetricTemplate>,
    /// `yyyy-MM-dd` date key to entry. Entries have no life of their own;
    /// deleting the activity discards them.
    #[serde(default)]
    pub entries: BTreeMap<String, Entry>,
    /// RFC3339 creation instant, stamped by the sync adapter.
    #[serde(default)]
    pub created_at: String,
}

impl Activity {
    /// The entry logged for a calendar date, if any.
    pub fn entry(&self, date: NaiveDate) -> Option<&Entry> {
        self.entries.get(&time_utils::format_date(date))
    }

    /// Whether the given date has a completed entry.
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.entry(date).is_some_and(|e| e.completed)
    }

    /// All dates with a completed entry, ascending. Unparseable keys are
    /// skipped.
    pub fn completed_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.completed)
            .filter_map(|(key, _)| time_utils::parse_date(key))
            .collect();
        dates.sort_unstable();
        dates
    }
}

/// Create payload: an activity definition without remote-assigned fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub metrics: Vec<MetricTemplate>,
    #[serde(default)]
    pub entries: BTreeMap<String, Entry>,
}

impl NewActivity {
    /// Validate the definition before it reaches the remote layer.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("activity name is required".into()));
        }
        if self.goal.target < 1 {
            return Err(AppError::Validation(
                "goal target must be at least 1".into(),
            ));
        }
        if !self.color.is_empty() && !is_rgb_hex(&self.color) {
            return Err(AppError::Validation(format!(
                "color must be an RGB hex value, got '{}'",
                self.color
            )));
        }
        Ok(())
    }

    /// Promote to a stored activity once the remote store has assigned an id.
    pub fn into_activity(self, id: String, created_at: String) -> Activity {
        Activity {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            color: self.color,
            icon: self.icon,
            activity_type: self.activity_type,
            goal: self.goal,
            metrics: self.metrics,
            entries: self.entries,
            created_at,
        }
    }
}

impl From<&Activity> for NewActivity {
    fn from(activity: &Activity) -> Self {
        Self {
            name: activity.name.clone(),
            description: activity.description.clone(),
            category: activity.category.clone(),
            color: activity.color.clone(),
            icon: activity.icon.clone(),
            activity_type: activity.activity_type,
            goal: activity.goal.clone(),
            metrics: activity.metrics.clone(),
            entries: activity.entries.clone(),
        }
    }
}

fn is_rgb_hex(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
