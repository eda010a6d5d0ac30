//! Time utility functions

use chrono::{DateTime, NaiveDate, Utc};

use crate::core::constants::ENTRY_DATE_FORMAT;

/// Parse an entry date string (`YYYY-MM-DD`).
///
/// Returns `None` for anything that does not parse as a calendar date;
/// callers decide whether that is a validation failure (writes) or a row to
/// skip (aggregation).
pub fn parse_entry_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ENTRY_DATE_FORMAT).ok()
}

/// Convert unix seconds to DateTime<Utc>, falling back to now on overflow
pub fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_entry_date_valid() {
        let date = parse_entry_date("2024-03-15").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_entry_date_trims_whitespace() {
        assert!(parse_entry_date(" 2024-03-15 ").is_some());
    }

    #[test]
    fn test_parse_entry_date_invalid() {
        assert!(parse_entry_date("").is_none());
        assert!(parse_entry_date("not-a-date").is_none());
        assert!(parse_entry_date("2024-13-01").is_none());
        assert!(parse_entry_date("2024-02-30").is_none());
        assert!(parse_entry_date("15/03/2024").is_none());
    }

    #[test]
    fn test_parse_entry_date_rejects_datetime() {
        assert!(parse_entry_date("2024-03-15T10:30:00Z").is_none());
    }

    #[test]
    fn test_timestamp_to_datetime() {
        // 2024-01-01 00:00:00 UTC
        let dt = timestamp_to_datetime(1704067200);
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 1);
    }
}
