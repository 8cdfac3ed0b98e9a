//! Human-readable backup ages.

use chrono::{DateTime, Utc};

/// Describe how long ago `instant` was, relative to `now`.
///
/// Buckets: `just now` under a minute, then minutes, hours and days, each
/// singular only when the count is exactly 1. Instants in the future read as
/// `just now`.
pub fn relative_time(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(instant).num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }

    plural(hours / 24, "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
