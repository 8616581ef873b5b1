use chrono::{DateTime, FixedOffset};

/// Format a log timestamp for display, keeping its original offset
pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

/// Calculate duration between two timestamps in human-readable format
pub fn duration_human(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> String {
    let duration = end.signed_duration_since(*start);
    let seconds = duration.num_seconds();

    if seconds < 60 {
        format!("{} seconds", seconds)
    } else if seconds < 3600 {
        format!("{} minutes", seconds / 60)
    } else if seconds < 86400 {
        format!("{:.1} hours", seconds as f64 / 3600.0)
    } else {
        format!("{:.1} days", seconds as f64 / 86400.0)
    }
}
