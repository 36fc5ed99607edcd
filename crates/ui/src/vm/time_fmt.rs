use chrono::{DateTime, Utc};
use drill_core::time::format_timestamp;

/// Timestamp as shown in lists and exported records.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    format_timestamp(value)
}
