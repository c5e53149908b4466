//! Time formatting utilities for transcript display.

use chrono::DateTime;

/// Convert a Unix timestamp (seconds) to an RFC 3339 string.
///
/// The backend stamps messages with whole seconds. Out-of-range values are
/// rendered as the raw number instead of panicking.
pub fn timestamp_to_rfc3339(timestamp_secs: i64) -> String {
    DateTime::from_timestamp(timestamp_secs, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| timestamp_secs.to_string())
}
