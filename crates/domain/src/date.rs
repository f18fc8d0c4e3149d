use chrono::{TimeZone, Utc};
use chrono_tz::Tz;

/// Millisecond timestamp of the most recent local midnight in `tz`.
///
/// On days where a DST transition swallows midnight the first existing
/// local hour of that day is used instead.
pub fn start_of_local_day(timestamp_millis: i64, tz: &Tz) -> i64 {
    let utc = match Utc.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => dt,
        None => return timestamp_millis,
    };
    let date = utc.with_timezone(tz).date_naive();

    (0..24)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .find_map(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(timestamp_millis)
}

/// Formats a millisecond timestamp for humans, e.g. in alert messages
pub fn format_timestamp(timestamp_millis: i64, tz: &Tz) -> String {
    match Utc.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => dt.with_timezone(tz).format("%F %R %Z").to_string(),
        None => timestamp_millis.to_string(),
    }
}
