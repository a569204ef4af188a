//! Timestamp normalisation policy.
//!
//! Everything leaving this crate is UTC. Values arriving without zone
//! information are read as local wall-clock time and converted; they are
//! never relabelled as UTC.

use super::TaskDomainError;
use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone,
    Utc,
};
use serde_json::Value;

/// Compact UTC form used by the store's JSON export (`20250822T180000Z`).
pub const STORE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

const COMPACT_NAIVE_FORMAT: &str = "%Y%m%dT%H%M%S";
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Converts a naive wall-clock value in `zone` to UTC.
///
/// Ambiguous local times (clock set back) resolve to the earlier instant.
/// Local times that do not exist (clock set forward) yield `None`.
#[must_use]
pub fn naive_to_utc<Tz: TimeZone>(naive: &NaiveDateTime, zone: &Tz) -> Option<DateTime<Utc>> {
    zone.from_local_datetime(naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Parses a timestamp string under the local-time policy for naive values.
#[must_use]
pub fn parse_with_zone<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(compact) = NaiveDateTime::parse_from_str(trimmed, STORE_FORMAT) {
        return Some(compact.and_utc());
    }
    if let Ok(aware) = DateTime::<FixedOffset>::parse_from_rfc3339(trimmed) {
        return Some(aware.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, COMPACT_NAIVE_FORMAT) {
        return naive_to_utc(&naive, zone);
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return naive_to_utc(&naive, zone);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| naive_to_utc(&date.and_time(NaiveTime::MIN), zone))
}

/// Reads a store value as a UTC timestamp, degrading to `None`.
///
/// Accepts the store's compact form, RFC 3339, naive ISO-8601 (local time),
/// and integer epoch seconds.
#[must_use]
pub fn from_store_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_with_zone(raw, &Local),
        Value::Number(number) => number
            .as_i64()
            .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0)),
        _ => None,
    }
}

/// Parses a caller-supplied timestamp.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidTimestamp`] when the value is not a
/// recognisable ISO-8601 timestamp.
pub fn parse_input(raw: &str) -> Result<DateTime<Utc>, TaskDomainError> {
    parse_with_zone(raw, &Local).ok_or_else(|| TaskDomainError::InvalidTimestamp(raw.to_owned()))
}

/// Formats a timestamp for callers: ISO-8601 with a trailing `Z`.
#[must_use]
pub fn to_wire(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Formats a timestamp in the store's compact UTC form.
#[must_use]
pub fn to_store(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(STORE_FORMAT).to_string()
}

/// Returns `true` when `due` lies strictly before `now`.
#[must_use]
pub fn is_overdue(due: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    due < now
}
