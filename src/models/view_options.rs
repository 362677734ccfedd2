// SPDX-License-Identifier: MIT

//! Device-local view preferences.

use serde::{Deserialize, Serialize};

/// Calendar grid density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridDensity {
    Compact,
    #[default]
    Normal,
    Spacious,
}

/// View preferences, persisted to local device storage under the
/// `viewOptions` key. Session-scoped and independent of activity data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptions {
    #[serde(default = "default_true")]
    pub show_weekends: bool,
    /// 0 = Sunday, 1 = Monday.
    #[serde(default)]
    pub first_day_of_week: u8,
    #[serde(default = "default_true")]
    pub show_streak: bool,
    #[serde(default)]
    pub grid_density: GridDensity,
    #[serde(default)]
    pub dark_mode: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_weekends: true,
            first_day_of_week: 0,
            show_streak: true,
            grid_density: GridDensity::Normal,
            dark_mode: false,
        }
    }
}

/// Partial update; fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptionsUpdate {
    pub show_weekends: Option<bool>,
    pub first_day_of_week: Option<u8>,
    pub show_streak: Option<bool>,
    pub grid_density: Option<GridDensity>,
    pub dark_mode: Option<bool>,
}

impl ViewOptions {
    /// Merge a partial update into these options.
    pub fn apply(&mut self, update: ViewOptionsUpdate) {
        if let Some(v) = update.show_weekends {
            self.show_weekends = v;
        }
        if let Some(v) = update.first_day_of_week {
            self.first_day_of_week = v;
        }
        if let Some(v) = update.show_streak {
            self.show_streak = v;
        }
        if let Some(v) = update.grid_density {
            self.grid_density = v;
        }
        if let Some(v) = update.dark_mode {
            self.dark_mode = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_merges_only_set_fields() {
        let mut options = ViewOptions::default();
        options.apply(ViewOptionsUpdate {
            dark_mode: Some(true),
            first_day_of_week: Some(1),
            ..Default::default()
        });

        assert!(options.dark_mode);
        assert_eq!(options.first_day_of_week, 1);
        // untouched fields keep defaults
        assert!(options.show_weekends);
        assert_eq!(options.grid_density, GridDensity::Normal);
    }
}
