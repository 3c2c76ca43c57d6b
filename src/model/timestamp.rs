//! Loose date/time parsing for column classification and day truncation.
//!
//! Values are interpreted as UTC. Offsets in RFC 3339 / RFC 2822 values are converted to UTC
//! before truncation. Bare digit strings (`2024`, `20240101`) are deliberately not dates so that
//! integer columns are never mistaken for timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// The canonical rendering of a timestamp after it has been truncated to its day.
pub const DAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y"];

/// Parses `s` as a date or date/time. ISO 8601 forms are tried first, then US month-first
/// forms, then RFC 2822. A month without a day (`2024-03`) is the first of that month.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|&format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|&format| NaiveDate::parse_from_str(s, format).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .or_else(|| parse_year_month(s))
        .or_else(|| {
            DateTime::parse_from_rfc2822(s)
                .map(|dt| dt.with_timezone(&Utc).naive_utc())
                .ok()
        })
}

/// Returns true if `s` parses as a date or date/time.
pub fn is_timestamp(s: &str) -> bool {
    parse_timestamp(s).is_some()
}

/// Truncates `s` to the start of its calendar day and renders it with [`DAY_FORMAT`], e.g.
/// `2024-01-01 08:00:00` becomes `2024-01-01 00:00:00`. Returns `None` if `s` is not a date.
pub fn start_of_day(s: &str) -> Option<String> {
    parse_timestamp(s).map(|dt| {
        dt.date()
            .and_time(NaiveTime::MIN)
            .format(DAY_FORMAT)
            .to_string()
    })
}

fn parse_year_month(s: &str) -> Option<NaiveDateTime> {
    let (year, month) = s.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_forms() {
        for s in [
            "2024-01-01",
            "2024-01-01 08:00:00",
            "2024-01-01T08:00:00",
            "2024-01-01 08:00",
            "2024-01-01 08:00:00.250",
            "2024-01-01T08:00:00Z",
            "2024-01-01T08:00:00+02:00",
            "2024-03",
        ] {
            assert!(is_timestamp(s), "{s} should parse");
        }
    }

    #[test]
    fn test_fallback_forms() {
        for s in [
            "01/15/2024",
            "01/15/2024 13:45",
            "01/15/2024 01:45:00 PM",
            "2024/01/15",
            "15 January 2024",
            "January 15, 2024",
            "Mon, 15 Jan 2024 10:00:00 +0000",
        ] {
            assert!(is_timestamp(s), "{s} should parse");
        }
    }

    #[test]
    fn test_not_dates() {
        for s in [
            "", "  ", "2024", "20240101", "12.5", "-3", "hello", "2024-13-01", "2024-02-30",
            "North",
        ] {
            assert!(!is_timestamp(s), "{s} should not parse");
        }
    }

    #[test]
    fn test_start_of_day() {
        assert_eq!(
            start_of_day("2024-01-01 23:00:00").as_deref(),
            Some("2024-01-01 00:00:00")
        );
        assert_eq!(
            start_of_day("2024-01-02 00:00:01").as_deref(),
            Some("2024-01-02 00:00:00")
        );
        assert_eq!(
            start_of_day("01/15/2024").as_deref(),
            Some("2024-01-15 00:00:00")
        );
    }

    #[test]
    fn test_start_of_day_uses_utc() {
        assert_eq!(
            start_of_day("2024-01-01T23:30:00-02:00").as_deref(),
            Some("2024-01-02 00:00:00")
        );
    }

    #[test]
    fn test_start_of_day_not_a_date() {
        assert!(start_of_day("soon").is_none());
    }
}
