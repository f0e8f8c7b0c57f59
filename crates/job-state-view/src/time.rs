//! Relative and absolute time formatting.
//!
//! The relative text ("3 minutes ago") goes stale as wall-clock time moves,
//! so renderers call [`humanize_relative_time`] again on every tick instead
//! of caching the string. [`refresh_period`] tells the caller how often the
//! text can actually change.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Placeholder shown when a record's timestamp cannot be parsed.
pub const UNKNOWN_TIME: &str = "unknown time";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Signature of a relative-time formatter: `(timestamp, now) -> text`.
pub type Humanizer = fn(DateTime<Utc>, DateTime<Utc>) -> String;

/// Human-phrased distance between `timestamp` and `now`.
///
/// Past instants read "5 minutes ago", future ones "5 minutes from now".
pub fn humanize_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(timestamp).num_seconds();
    let seconds = delta.abs();

    if seconds < 1 {
        return "just now".to_string();
    }

    let (unit, name) = if seconds < MINUTE {
        (1, "second")
    } else if seconds < HOUR {
        (MINUTE, "minute")
    } else if seconds < DAY {
        (HOUR, "hour")
    } else if seconds < WEEK {
        (DAY, "day")
    } else if seconds < MONTH {
        (WEEK, "week")
    } else if seconds < YEAR {
        (MONTH, "month")
    } else {
        (YEAR, "year")
    };

    // Round half up, like the dashboard's web client
    let value = (seconds + unit / 2) / unit;
    let plural = if value == 1 { "" } else { "s" };
    let suffix = if delta >= 0 { "ago" } else { "from now" };

    format!("{} {}{} {}", value, name, plural, suffix)
}

/// Precise representation kept next to the relative text.
pub fn format_absolute(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// How long until the relative text for `timestamp` can change.
pub fn refresh_period(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let seconds = now.signed_duration_since(timestamp).num_seconds().abs();

    let period = if seconds < MINUTE {
        1
    } else if seconds < HOUR {
        MINUTE
    } else if seconds < DAY {
        HOUR
    } else {
        DAY
    };

    Duration::from_secs(period as u64)
}
