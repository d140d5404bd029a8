// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
pub fn parse_date_utc(s: &str) -> Option<DateTime<Utc>> {
    let date = s.parse::<NaiveDate>().ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Render a duration in whole seconds as `H:MM:SS` or `M:SS`.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Render pace in seconds-per-meter as `M:SS` minutes per kilometer.
pub fn format_pace_per_km(pace_s_per_m: f64) -> String {
    let secs_per_km = pace_s_per_m * 1000.0;
    let minutes = (secs_per_km / 60.0).floor() as u64;
    let seconds = (secs_per_km - minutes as f64 * 60.0).round() as u64;
    format!("{}:{:02}", minutes, seconds)
}
