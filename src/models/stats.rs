// SPDX-License-Identifier: MIT

//! Derived activity metrics: streaks, weekly completion, goal status.
//!
//! Everything here is a pure function over an activity's entries. Results
//! are never persisted; they are recomputed on every read.

use chrono::{Duration, NaiveDate, Weekday};

use crate::models::Activity;
use crate::time_utils;

/// Bounded streak period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Year,
}

/// Completion count and percentage over a set of week dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyCompletion {
    pub completed: u32,
    /// round(100 * completed / len); 0 for an empty week.
    pub percent: u8,
}

/// Whether the activity is keeping pace with its goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalStatus {
    pub on_track: bool,
}

/// Aggregate stats for one activity, as shown on its card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityStats {
    pub weekly_completions: u32,
    /// Percent of the goal target reached this week, capped at 100.
    pub goal_progress: u8,
    pub streak: u32,
    pub is_on_track: bool,
}

/// Consecutive completed days ending at `as_of`.
///
/// Walks backward day by day and stops at the first day without a
/// completed entry. If `as_of` itself is incomplete the streak is 0,
/// regardless of earlier history.
pub fn current_streak(activity: &Activity, as_of: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut date = as_of;
    while activity.is_completed_on(date) {
        streak += 1;
        date -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive completed days anywhere in the history.
///
/// A day-to-day delta of exactly one calendar day extends the run; any
/// other delta resets it. 0 when nothing was ever completed.
pub fn longest_streak(activity: &Activity) -> u32 {
    let dates = activity.completed_dates();
    if dates.is_empty() {
        return 0;
    }

    let mut run = 1;
    let mut longest = 1;
    for pair in dates.windows(2) {
        if pair[1] - pair[0] == Duration::days(1) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }
    longest
}

/// Backward streak bounded below by the start of the period containing
/// `today`. Weeks start on Sunday, matching the default calendar layout.
pub fn period_streak(activity: &Activity, period: Period, today: NaiveDate) -> u32 {
    let period_start = match period {
        Period::Week => time_utils::start_of_week(today, Weekday::Sun),
        Period::Month => time_utils::start_of_month(today),
        Period::Year => time_utils::start_of_year(today),
    };

    let mut streak = 0;
    let mut date = today;
    while date >= period_start && activity.is_completed_on(date) {
        streak += 1;
        date -= Duration::days(1);
    }
    streak
}

/// Completions over the given week dates (7 or fewer when weekends are
/// hidden).
pub fn weekly_completion(activity: &Activity, week_dates: &[NaiveDate]) -> WeeklyCompletion {
    let completed = week_dates
        .iter()
        .filter(|date| activity.is_completed_on(**date))
        .count() as u32;

    let percent = if week_dates.is_empty() {
        0
    } else {
        (100.0 * completed as f64 / week_dates.len() as f64).round() as u8
    };

    WeeklyCompletion { completed, percent }
}

/// Goal pace check: on track when this week's completions have reached
/// the goal target. No time-of-week weighting is applied.
pub fn goal_status(activity: &Activity, week_dates: &[NaiveDate]) -> GoalStatus {
    let completions = weekly_completion(activity, week_dates).completed;
    GoalStatus {
        on_track: completions >= activity.goal.target,
    }
}

/// Card-level aggregate combining the individual computations.
pub fn activity_stats(
    activity: &Activity,
    week_dates: &[NaiveDate],
    today: NaiveDate,
) -> ActivityStats {
    let weekly = weekly_completion(activity, week_dates);
    let target = activity.goal.target.max(1);
    let goal_progress =
        ((100.0 * weekly.completed as f64 / target as f64).round() as u8).min(100);

    ActivityStats {
        weekly_completions: weekly.completed,
        goal_progress,
        streak: current_streak(activity, today),
        is_on_track: goal_status(activity, week_dates).on_track,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, Frequency, Goal};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_activity(completed_on: &[&str]) -> Activity {
        let mut activity = Activity {
            name: "Read".to_string(),
            ..Default::default()
        };
        for date in completed_on {
            activity.entries.insert(
                date.to_string(),
                Entry::completion(true, "2024-01-15T12:00:00Z".to_string()),
            );
        }
        activity
    }

    #[test]
    fn test_current_streak_counts_backward() {
        let activity = make_activity(&["2024-01-13", "2024-01-14", "2024-01-15"]);
        assert_eq!(current_streak(&activity, day(2024, 1, 15)), 3);
    }

    #[test]
    fn test_current_streak_zero_when_as_of_incomplete() {
        let activity = make_activity(&["2024-01-13", "2024-01-14"]);
        // No entry on the 15th: earlier history does not count
        assert_eq!(current_streak(&activity, day(2024, 1, 15)), 0);
    }

    #[test]
    fn test_current_streak_stops_at_incomplete_entry() {
        let mut activity = make_activity(&["2024-01-12", "2024-01-14", "2024-01-15"]);
        activity.entries.insert(
            "2024-01-13".to_string(),
            Entry::completion(false, String::new()),
        );
        assert_eq!(current_streak(&activity, day(2024, 1, 15)), 2);
    }

    #[test]
    fn test_current_streak_idempotent() {
        let activity = make_activity(&["2024-01-14", "2024-01-15"]);
        let first = current_streak(&activity, day(2024, 1, 15));
        assert_eq!(first, current_streak(&activity, day(2024, 1, 15)));
        assert_eq!(first, 2);
    }

    #[test]
    fn test_longest_streak_ignores_gaps() {
        // Runs: 01-01..01-03 (3) and 01-05 (1); answer is 3, not 4
        let activity = make_activity(&["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-05"]);
        assert_eq!(longest_streak(&activity), 3);
    }

    #[test]
    fn test_longest_streak_empty_history() {
        let activity = make_activity(&[]);
        assert_eq!(longest_streak(&activity), 0);

        let mut only_incomplete = make_activity(&[]);
        only_incomplete.entries.insert(
            "2024-01-01".to_string(),
            Entry::completion(false, String::new()),
        );
        assert_eq!(longest_streak(&only_incomplete), 0);
    }

    #[test]
    fn test_longest_streak_single_day() {
        let activity = make_activity(&["2024-01-01"]);
        assert_eq!(longest_streak(&activity), 1);
    }

    #[test]
    fn test_period_streak_bounded_by_week_start() {
        // 2024-01-10 is a Wednesday; week starts Sunday 2024-01-07.
        // Completions run back into the previous week, but the walk
        // never crosses the period start.
        let activity = make_activity(&[
            "2024-01-05",
            "2024-01-06",
            "2024-01-07",
            "2024-01-08",
            "2024-01-09",
            "2024-01-10",
        ]);
        assert_eq!(period_streak(&activity, Period::Week, day(2024, 1, 10)), 4);
        assert_eq!(period_streak(&activity, Period::Month, day(2024, 1, 10)), 6);
    }

    #[test]
    fn test_period_streak_month_bound() {
        let activity = make_activity(&["2024-01-31", "2024-02-01", "2024-02-02"]);
        assert_eq!(period_streak(&activity, Period::Month, day(2024, 2, 2)), 2);
        assert_eq!(period_streak(&activity, Period::Year, day(2024, 2, 2)), 3);
    }

    #[test]
    fn test_weekly_completion_rounding() {
        let activity = make_activity(&[
            "2024-01-07",
            "2024-01-08",
            "2024-01-09",
            "2024-01-10",
            "2024-01-11",
        ]);
        let week: Vec<NaiveDate> = (7..14).map(|d| day(2024, 1, d)).collect();

        let result = weekly_completion(&activity, &week);
        assert_eq!(result.completed, 5);
        assert_eq!(result.percent, 71); // round(500/7)
    }

    #[test]
    fn test_weekly_completion_empty_input() {
        let activity = make_activity(&["2024-01-07"]);
        let result = weekly_completion(&activity, &[]);
        assert_eq!(result.completed, 0);
        assert_eq!(result.percent, 0);
    }

    #[test]
    fn test_goal_status_reference_scenario() {
        // Goal: 3x weekly; completed Monday + Tuesday only.
        let mut activity = make_activity(&["2024-01-08", "2024-01-09"]);
        activity.goal = Goal {
            frequency: Frequency::Weekly,
            target: 3,
            time_per_session: None,
        };
        let week: Vec<NaiveDate> = (7..14).map(|d| day(2024, 1, d)).collect();

        let completion = weekly_completion(&activity, &week);
        assert_eq!(completion.percent, 29); // round(200/7)
        assert!(!goal_status(&activity, &week).on_track); // 2 < 3

        // A third completion reaches the target
        activity.entries.insert(
            "2024-01-11".to_string(),
            Entry::completion(true, String::new()),
        );
        assert!(goal_status(&activity, &week).on_track);
    }

    #[test]
    fn test_activity_stats_aggregate() {
        let mut activity = make_activity(&["2024-01-09", "2024-01-10"]);
        activity.goal.target = 4;
        let week: Vec<NaiveDate> = (7..14).map(|d| day(2024, 1, d)).collect();

        let stats = activity_stats(&activity, &week, day(2024, 1, 10));
        assert_eq!(stats.weekly_completions, 2);
        assert_eq!(stats.goal_progress, 50);
        assert_eq!(stats.streak, 2);
        assert!(!stats.is_on_track);
    }

    #[test]
    fn test_goal_progress_capped_at_100() {
        let mut activity =
            make_activity(&["2024-01-08", "2024-01-09", "2024-01-10", "2024-01-11"]);
        activity.goal.target = 2;
        let week: Vec<NaiveDate> = (7..14).map(|d| day(2024, 1, d)).collect();

        let stats = activity_stats(&activity, &week, day(2024, 1, 11));
        assert_eq!(stats.goal_progress, 100);
        assert!(stats.is_on_track);
    }
}
