use chrono::{Local, TimeZone};
use std::time::{SystemTime, UNIX_EPOCH};

/// Render a Unix timestamp in local time, the same layout the log lines use
pub fn format_timestamp(timestamp: u64) -> String {
    match Local.timestamp_opt(timestamp as i64, 0).earliest() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}

/// Get current Unix timestamp
pub fn get_current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
