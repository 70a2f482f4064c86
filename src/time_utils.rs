// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{Datelike, DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a user-supplied timestamp.
///
/// Accepts RFC3339 (`2024-06-01T10:00:00Z`), the HTML `datetime-local`
/// format (`2024-06-01T10:00`, taken as UTC) and a bare date (midnight UTC).
/// Years must have exactly four digits, as the stored form requires.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    parse_any(raw.trim()).filter(|dt| (0..=9999).contains(&dt.year()))
}

fn parse_any(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).trunc_subsecs(0));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Current time at the precision timestamps are stored with.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Value for an HTML `datetime-local` input.
pub fn format_datetime_local(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M").to_string()
}

/// Serde adapter storing timestamps as fixed-width RFC3339 strings, so that
/// string ordering in the document store matches chronological ordering.
pub mod utc_seconds {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_utc_rfc3339(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_accepts_supported_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-06-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T10:30"), Some(expected));
        assert_eq!(
            parse_timestamp(" 2024-06-01 "),
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }

    #[test]
    fn test_parse_rejects_years_outside_four_digits() {
        assert_eq!(parse_timestamp("+10000-01-01"), None);
        assert_eq!(parse_timestamp("+10000-01-01T10:00"), None);
        assert_eq!(parse_timestamp("-0001-01-01"), None);
        // Offset pushes the UTC value past the last four-digit year.
        assert_eq!(parse_timestamp("9999-12-31T23:00:00-02:00"), None);
        assert!(parse_timestamp("9999-12-31").is_some());
    }

    #[test]
    fn test_stored_format_sorts_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let later = earlier + chrono::Duration::milliseconds(1500);
        assert!(format_utc_rfc3339(earlier) < format_utc_rfc3339(later));
        assert_eq!(format_utc_rfc3339(earlier), "2024-06-01T09:00:00Z");
    }
}
