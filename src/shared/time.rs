//! Node time format helpers.
//!
//! Graphene nodes exchange timestamps as `%Y-%m-%dT%H:%M:%S` in UTC with no
//! offset suffix. Some endpoints append a trailing `Z`; both are accepted.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Timestamp format used by the node.
pub const NODE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a UTC time the way the node expects it.
pub fn format_node_time(time: DateTime<Utc>) -> String {
    time.format(NODE_TIME_FORMAT).to_string()
}

/// Node-formatted time `secs` seconds from now.
pub fn format_time_from_now(secs: u64) -> String {
    let secs = i64::try_from(secs).unwrap_or(i64::MAX);
    let offset = Duration::try_seconds(secs).unwrap_or(Duration::MAX);
    let time = Utc::now()
        .checked_add_signed(offset)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    format_node_time(time)
}

/// Parse a node timestamp.
pub fn parse_node_time(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let trimmed = s.strip_suffix('Z').unwrap_or(s);
    NaiveDateTime::parse_from_str(trimmed, NODE_TIME_FORMAT).map(|naive| naive.and_utc())
}

/// Unix epoch seconds of a node timestamp.
pub fn to_epoch_seconds(s: &str) -> Result<i64, chrono::ParseError> {
    parse_node_time(s).map(|t| t.timestamp())
}
