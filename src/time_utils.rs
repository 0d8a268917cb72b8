// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.
//!
//! Stored timestamps use a fixed-width form with microsecond precision so
//! that string comparison (Firestore range filters) matches time order.

use chrono::{DateTime, Duration, NaiveDateTime, SubsecRound, Utc};

const STORED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// ISO local date-time with the seconds left off (`datetime-local` inputs).
const MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Current time at the precision timestamps are stored with.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Format a UTC timestamp as fixed-width RFC3339 with a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.format(STORED_FORMAT).to_string()
}

/// Parse a query-string timestamp.
///
/// Accepts RFC3339 (any offset) or an ISO local date-time such as
/// `2025-03-01T08:30:00` or `2025-03-01T08:30`, which is taken to be UTC.
pub fn parse_query_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, MINUTE_FORMAT))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Round down to the stored microsecond precision.
pub fn floor_micros(date: DateTime<Utc>) -> DateTime<Utc> {
    // Sub-second nanos are never negative, so truncation rounds down.
    date.trunc_subsecs(6)
}

/// Round up to the stored microsecond precision.
pub fn ceil_micros(date: DateTime<Utc>) -> DateTime<Utc> {
    let floored = floor_micros(date);
    if floored < date {
        floored + Duration::microseconds(1)
    } else {
        floored
    }
}

/// Serde adapter storing `DateTime<Utc>` in the fixed-width form.
pub mod fixed_rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_utc_rfc3339(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_utc_rfc3339(whole), "2025-01-02T03:04:05.000000Z");

        let fractional = whole + chrono::Duration::microseconds(120);
        assert_eq!(format_utc_rfc3339(fractional), "2025-01-02T03:04:05.000120Z");
        assert!(format_utc_rfc3339(whole) < format_utc_rfc3339(fractional));
    }

    #[test]
    fn parse_accepts_local_and_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();

        assert_eq!(parse_query_timestamp("2025-03-01T08:30:00"), Some(expected));
        assert_eq!(parse_query_timestamp("2025-03-01T08:30:00Z"), Some(expected));
        assert_eq!(
            parse_query_timestamp("2025-03-01T10:30:00+02:00"),
            Some(expected)
        );
        assert_eq!(
            parse_query_timestamp("2025-03-01T08:30:00.000000Z"),
            Some(expected)
        );
        assert_eq!(parse_query_timestamp("2025-03-01T08:30"), Some(expected));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_query_timestamp("yesterday"), None);
        assert_eq!(parse_query_timestamp("2025-03-01"), None);
        assert_eq!(parse_query_timestamp(""), None);
    }

    #[test]
    fn rounding_to_micros() {
        let whole = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let half_micro = whole + chrono::Duration::nanoseconds(500);

        assert_eq!(floor_micros(half_micro), whole);
        assert_eq!(ceil_micros(half_micro), whole + chrono::Duration::microseconds(1));
        assert_eq!(floor_micros(whole), whole);
        assert_eq!(ceil_micros(whole), whole);

        let before_epoch = Utc.timestamp_opt(-1, 999_999_500).unwrap();
        assert_eq!(floor_micros(before_epoch), Utc.timestamp_opt(-1, 999_999_000).unwrap());
        assert_eq!(ceil_micros(before_epoch), Utc.timestamp_opt(0, 0).unwrap());
    }

    #[test]
    fn now_has_microsecond_precision() {
        let now = now_utc();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000, 0);
    }
}
