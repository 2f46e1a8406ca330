//! Shared timestamp parsing for the CSV, XES and OCEL importers

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Parse a timestamp string to `DateTime<FixedOffset>`, trying multiple formats.
///
/// A custom format (if provided) takes precedence and is tried both as a
/// timezone-aware and as a naive pattern (naive values are assumed UTC).
/// Afterwards the following fallbacks are attempted in order:
///
/// 1. RFC 3339: `2023-10-06T09:30:21+00:00`
/// 2. ISO 8601 with offset (no colon): `2023-10-06T09:30:21+0000`
/// 3. RFC 2822: `Fri, 06 Oct 2023 09:30:21 +0000`
/// 4. Naive datetime with optional fractional seconds: `2023-10-06 09:30:21.890421`
/// 5. Naive ISO 8601 with optional fractional seconds: `2023-10-06T09:30:21`
/// 6. Naive with UTC suffix: `2023-10-06 09:30:21 UTC`
///
/// Returns `None` if no format matches; callers coerce this to an absent
/// value instead of aborting a conversion.
pub fn parse_timestamp(time: &str, custom_format: Option<&str>) -> Option<DateTime<FixedOffset>> {
    if let Some(date_format) = custom_format {
        if let Ok(dt) = DateTime::parse_from_str(time, date_format) {
            return Some(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, date_format) {
            return Some(dt.and_utc().into());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(time) {
        return Some(dt);
    }

    // Some logs have this date: "2023-10-06 09:30:21.890421"
    // Assuming that this is UTC
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%F %T%.f") {
        return Some(dt.and_utc().into());
    }

    // Also handles "2024-10-02T07:55:15.348555" as well as "2022-01-09T15:00:00"
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%FT%T%.f") {
        return Some(dt.and_utc().into());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%F %T UTC") {
        return Some(dt.and_utc().into());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339() {
        assert!(parse_timestamp("2023-10-06T09:30:21+00:00", None).is_some());
    }

    #[test]
    fn test_naive_datetime() {
        assert!(parse_timestamp("2023-10-06 09:30:21.890421", None).is_some());
    }

    #[test]
    fn test_naive_iso() {
        assert!(parse_timestamp("2023-10-06T09:30:21", None).is_some());
    }

    #[test]
    fn test_custom_format() {
        assert!(parse_timestamp("06/10/2023 09:30:21", Some("%d/%m/%Y %H:%M:%S")).is_some());
    }

    #[test]
    fn test_garbage() {
        assert!(parse_timestamp("not a timestamp", None).is_none());
    }
}
