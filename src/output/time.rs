//! Human-readable timestamps for relationship "since" values.

use chrono::{DateTime, Utc};

const UNKNOWN: &str = "Unknown";

/// Formats an RFC 3339 timestamp as `YYYY-MM-DD HH:MM` in its own offset.
///
/// Empty input yields "Unknown"; unparsable input is returned unchanged.
pub fn format_time(since: &str) -> String {
    if since.is_empty() {
        return UNKNOWN.to_string();
    }
    match DateTime::parse_from_rfc3339(since) {
        Ok(parsed) => parsed.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => since.to_string(),
    }
}

/// Describes how long ago `since` was, relative to `now`.
///
/// Months are 30 days and years 365 days.
pub fn format_time_since(since: &str, now: DateTime<Utc>) -> String {
    if since.is_empty() {
        return UNKNOWN.to_string();
    }
    let Ok(parsed) = DateTime::parse_from_rfc3339(since) else {
        return since.to_string();
    };

    let hours = now.signed_duration_since(parsed).num_hours();
    let days = hours / 24;

    if days < 1 {
        return match hours {
            h if h < 1 => "Less than an hour ago".to_string(),
            1 => "1 hour ago".to_string(),
            h => format!("{h} hours ago"),
        };
    }
    if days < 30 {
        return plural_ago(days, "day");
    }
    if days < 365 {
        return plural_ago(days / 30, "month");
    }

    let years = days / 365;
    let remaining_days = days % 365;
    if remaining_days < 30 {
        return plural_ago(years, "year");
    }
    let months = remaining_days / 30;
    format!("{years} {}, {months} {} ago", unit(years, "year"), unit(months, "month"))
}

fn unit(count: i64, singular: &str) -> String {
    if count > 1 {
        format!("{singular}s")
    } else {
        singular.to_string()
    }
}

fn plural_ago(count: i64, singular: &str) -> String {
    format!("{count} {} ago", unit(count, singular))
}
