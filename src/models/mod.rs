// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod activity;
pub mod entry;
pub mod log;
pub mod metric;
pub mod stats;
pub mod view_options;

pub use activity::{Activity, ActivityType, Frequency, Goal, NewActivity};
pub use entry::Entry;
pub use log::LogRecord;
pub use metric::{MetricScalar, MetricTemplate, MetricType, MetricValue};
pub use stats::{ActivityStats, GoalStatus, Period, WeeklyCompletion};
pub use view_options::{GridDensity, ViewOptions, ViewOptionsUpdate};
