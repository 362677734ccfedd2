// SPDX-License-Identifier: MIT

//! Shared helpers for calendar and timestamp handling.
//!
//! Entry keys use the `yyyy-MM-dd` format; timestamps are RFC3339.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc, Weekday};

/// Format a calendar date as `yyyy-MM-dd` (the entry key format).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `yyyy-MM-dd` entry key back into a date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current instant as an RFC3339 string (entry/document timestamps).
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Today's calendar date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// First day of the week containing `date`.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    date - Duration::days(date.weekday().days_since(week_start) as i64)
}

/// First day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// January 1st of the year containing `date`.
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// The seven days of the week containing `date`, starting at `week_start`.
///
/// Callers that hide weekends trim the result themselves.
pub fn week_days(date: NaiveDate, week_start: Weekday) -> Vec<NaiveDate> {
    let start = start_of_week(date, week_start);
    (0..7).map(|i| start + Duration::days(i)).collect()
}

/// Map a stored `firstDayOfWeek` preference (0 = Sunday, 1 = Monday) to a weekday.
pub fn week_start_from_pref(first_day_of_week: u8) -> Weekday {
    if first_day_of_week == 1 {
        Weekday::Mon
    } else {
        Weekday::Sun
    }
}
