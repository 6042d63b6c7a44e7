// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.
//!
//! All calendar bucketing goes through one fixed application offset so that
//! "day", "week" and "month" mean the same thing in streaks, analytics and
//! finance summaries.
//!
//! Timestamps that participate in Firestore range filters are stored as
//! strings and compared lexicographically, so they must use one fixed-width
//! format. [`format_utc_nanos`] (and the [`rfc3339_nanos`] serde helper for
//! the stored fields) pins both sides to nanosecond precision; a bound and a
//! stored value for the same instant compare equal, and sub-second ordering
//! matches chronological ordering.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 with a fixed nine-digit fraction and a
/// `Z` suffix, e.g. `2026-03-08T20:00:00.123456789Z`.
pub fn format_utc_nanos(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Serde adapter for stored timestamps that are used in string range
/// filters. Serializes with [`format_utc_nanos`]; accepts any RFC3339
/// fraction on the way back in.
pub mod rfc3339_nanos {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_utc_nanos(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Calendar day of a UTC instant at the fixed application offset.
pub fn local_day(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

/// Today's calendar day at the fixed application offset.
pub fn today(offset: FixedOffset) -> NaiveDate {
    local_day(Utc::now(), offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_stored_and_bound_formats_agree() {
        #[derive(serde::Serialize)]
        struct Doc {
            #[serde(with = "rfc3339_nanos")]
            created_at: DateTime<Utc>,
        }

        let ts = Utc.with_ymd_and_hms(2026, 3, 8, 20, 0, 0).unwrap()
            + Duration::nanoseconds(123_456_789);
        let stored = serde_json::to_value(Doc { created_at: ts }).unwrap();

        // The stored string and a query bound for the same instant must be
        // byte-identical, or a less_than bound would re-match its own row.
        assert_eq!(stored["created_at"], format_utc_nanos(ts));
        assert_eq!(
            stored["created_at"].as_str().unwrap(),
            "2026-03-08T20:00:00.123456789Z"
        );
    }

    #[test]
    fn test_whole_seconds_keep_full_fraction() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 8, 20, 0, 0).unwrap();
        assert_eq!(format_utc_nanos(ts), "2026-03-08T20:00:00.000000000Z");
    }

    #[test]
    fn test_lexicographic_order_matches_chronological() {
        let base = Utc.with_ymd_and_hms(2026, 3, 8, 20, 0, 0).unwrap();
        let instants = [
            base,
            base + Duration::nanoseconds(1),
            base + Duration::milliseconds(500),
            base + Duration::seconds(1),
            base + Duration::days(1),
        ];
        for pair in instants.windows(2) {
            assert!(format_utc_nanos(pair[0]) < format_utc_nanos(pair[1]));
        }
    }

    #[test]
    fn test_round_trip_preserves_nanos() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Doc {
            #[serde(with = "rfc3339_nanos")]
            created_at: DateTime<Utc>,
        }

        let ts = Utc.with_ymd_and_hms(2026, 3, 8, 20, 0, 0).unwrap()
            + Duration::nanoseconds(987_654_321);
        let json = serde_json::to_string(&Doc { created_at: ts }).unwrap();
        let back: Doc = serde_json::from_str(&json).unwrap();
        assert_eq!(back.created_at, ts);
    }

    #[test]
    fn test_local_day_crosses_midnight_at_offset() {
        let offset = FixedOffset::east_opt(330 * 60).unwrap();
        // 19:30 UTC is 01:00 the next day at +05:30.
        let ts = Utc.with_ymd_and_hms(2026, 3, 8, 19, 30, 0).unwrap();
        assert_eq!(
            local_day(ts, offset),
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
        );
    }
}
