// SPDX-License-Identifier: MIT

//! Typed metrics attached to activity entries.
//!
//! An activity carries an ordered list of [`MetricTemplate`]s; at log time
//! the user supplies [`MetricValue`]s which are folded into the entry's
//! metrics map. Values are not persisted independently.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Metric value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    #[default]
    Number,
    Scale,
    Mood,
    Time,
    Distance,
    Boolean,
    Text,
}

/// Metric definition on an activity.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricTemplate {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub metric_type: MetricType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Inclusive [low, high] bounds for scale metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[i64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<MetricScalar>,
    #[serde(default)]
    pub required: bool,
}

/// A scalar value stored in an entry's metrics map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricScalar {
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl MetricScalar {
    /// Empty-string values are treated as absent (never transmitted).
    pub fn is_empty(&self) -> bool {
        matches!(self, MetricScalar::Text(s) if s.is_empty())
    }

    /// Numeric view, parsing text when it looks like a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricScalar::Number(n) => Some(*n),
            MetricScalar::Text(s) => s.parse().ok(),
            MetricScalar::Boolean(_) => None,
        }
    }
}

impl std::fmt::Display for MetricScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricScalar::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            MetricScalar::Boolean(b) => write!(f, "{}", b),
            MetricScalar::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Ephemeral metric value captured at log time, used for display and
/// for building an entry's metrics map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_type: Option<String>,
    pub value: MetricScalar,
}

/// The default "emotion" mood set: (value, emoji, label).
const MOOD_EMOTION: [(i64, &str, &str); 5] = [
    (1, "😭", "Terrible"),
    (2, "😢", "Sad"),
    (3, "😐", "Okay"),
    (4, "😊", "Good"),
    (5, "🥰", "Great"),
];

impl MetricValue {
    /// Human-readable rendering of the value.
    ///
    /// Moods render as `{emoji} ({v}/5)`, times as `XhYm`, numbers and
    /// scales with their unit appended.
    pub fn display_value(&self) -> String {
        if self.value.is_empty() {
            return "-".to_string();
        }

        match self.metric_type {
            MetricType::Mood => {
                let v = self.value.as_number().unwrap_or(0.0) as i64;
                let emoji = MOOD_EMOTION
                    .iter()
                    .find(|(value, _, _)| *value == v)
                    .map(|(_, emoji, _)| *emoji)
                    .unwrap_or("");
                format!("{} ({}/5)", emoji, v)
            }
            MetricType::Time => {
                let minutes = self.value.as_number().unwrap_or(0.0) as i64;
                let hours = minutes / 60;
                let rest = minutes % 60;
                if hours > 0 {
                    format!("{}h {}m", hours, rest)
                } else {
                    format!("{}m", rest)
                }
            }
            MetricType::Number | MetricType::Scale => match &self.unit {
                Some(unit) => format!("{} {}", self.value, unit),
                None => self.value.to_string(),
            },
            _ => self.value.to_string(),
        }
    }
}

/// Display label for a metric name.
///
/// Empty names fall back to a default label; snake_case and camelCase
/// names are expanded into words with the first letter capitalized.
pub fn display_name(name: &str) -> String {
    if name.is_empty() {
        return "Mood".to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.replace('_', " ").chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            out.push(' ');
        }
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check that every required metric template has a non-empty value.
///
/// Blocks local submission; a validation failure never reaches the
/// remote layer.
pub fn validate_required(templates: &[MetricTemplate], values: &[MetricValue]) -> Result<()> {
    for template in templates.iter().filter(|t| t.required) {
        let supplied = values
            .iter()
            .any(|v| v.name == template.name && !v.value.is_empty());
        if !supplied {
            return Err(AppError::Validation(format!(
                "metric '{}' is required",
                template.name
            )));
        }
    }
    Ok(())
}
