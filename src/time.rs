//! Timestamp helpers. Stored timestamps are RFC 3339 UTC strings.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeDelta, Utc};

pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_iso() -> String {
    to_iso(Utc::now())
}

/// Parses RFC 3339 and SQLite `CURRENT_TIMESTAMP` values.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc())
        })
}

/// True when `timestamp` is missing, unparseable or at least `min_minutes` old.
/// An interval too large for `TimeDelta` never elapses.
pub fn is_past(timestamp: Option<&str>, min_minutes: i64, now: DateTime<Utc>) -> bool {
    let Some(last) = timestamp.and_then(parse_timestamp) else {
        return true;
    };
    TimeDelta::try_minutes(min_minutes).is_some_and(|min| now - last >= min)
}
