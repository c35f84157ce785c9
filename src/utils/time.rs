//! Time formatting utilities

use chrono::{DateTime, Local, Utc};

/// Format a trim offset as `00:MM:SS`
///
/// Hours are always `00`; offsets past the hour keep counting minutes, which
/// ffmpeg still accepts.
pub fn format_trim_offset(seconds: u32) -> String {
    format!("00:{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Compact local timestamp for the record table, `-` when unset
pub fn format_table_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.with_timezone(&Local).format("%m%d:%H%M").to_string(),
        None => "-".to_string(),
    }
}
