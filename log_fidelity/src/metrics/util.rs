//! Small shared helpers for the metrics extractors

use chrono::{DateTime, FixedOffset};

/// Elapsed time range in hours between the earliest and latest timestamp
///
/// Zero when fewer than two distinct timestamps exist; never fails on a
/// single-event or empty log.
pub(crate) fn time_range_hours<I>(timestamps: I) -> f64
where
    I: IntoIterator<Item = DateTime<FixedOffset>>,
{
    let mut min: Option<DateTime<FixedOffset>> = None;
    let mut max: Option<DateTime<FixedOffset>> = None;
    for ts in timestamps {
        min = Some(min.map_or(ts, |m| m.min(ts)));
        max = Some(max.map_or(ts, |m| m.max(ts)));
    }
    match (min, max) {
        (Some(min), Some(max)) => (max - min).num_seconds() as f64 / 3600.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_time_range() {
        let range = time_range_hours(vec![
            ts("2023-10-06T09:00:00+00:00"),
            ts("2023-10-06T12:30:00+00:00"),
            ts("2023-10-06T10:00:00+00:00"),
        ]);
        assert!((range - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_time_range_degenerate() {
        assert_eq!(time_range_hours(Vec::new()), 0.0);
        assert_eq!(time_range_hours(vec![ts("2023-10-06T09:00:00+00:00")]), 0.0);
    }
}
