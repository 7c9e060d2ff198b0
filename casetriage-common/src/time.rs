//! Calendar date utilities
//!
//! Case exports carry day-first dates (`dd/mm/yyyy`). Values that do not match
//! the expected format are reported as missing rather than mapped to an epoch.

use chrono::NaiveDate;

/// Default day-first date format used by case exports
pub const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";

/// Parse a date cell with the given chrono format
///
/// Leading and trailing whitespace is ignored. Returns `None` for empty cells
/// and for anything that does not match `format` exactly.
pub fn parse_date(value: &str, format: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_day_first(value: &str) -> Option<NaiveDate> {
        parse_date(value, DAY_FIRST_FORMAT)
    }

    #[test]
    fn test_parse_day_first_padded() {
        let date = parse_day_first("20/04/2025").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 4, 20).unwrap());
    }

    #[test]
    fn test_parse_day_first_unpadded() {
        let date = parse_day_first("3/4/2025").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 4, 3).unwrap());
    }

    #[test]
    fn test_parse_day_first_trims_whitespace() {
        assert!(parse_day_first("  01/02/2024 ").is_some());
    }

    #[test]
    fn test_parse_day_first_rejects_month_first() {
        // 04/20 is not a valid day/month pair
        assert!(parse_day_first("04/20/2025").is_none());
    }

    #[test]
    fn test_parse_day_first_rejects_iso() {
        assert!(parse_day_first("2025-04-20").is_none());
    }

    #[test]
    fn test_parse_day_first_rejects_trailing_time() {
        assert!(parse_day_first("20/04/2025 10:15").is_none());
    }

    #[test]
    fn test_parse_day_first_empty() {
        assert!(parse_day_first("").is_none());
        assert!(parse_day_first("   ").is_none());
    }

    #[test]
    fn test_parse_date_custom_format() {
        let date = parse_date("2025-04-20", "%Y-%m-%d").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 4, 20).unwrap());
    }

    #[test]
    fn test_parse_day_first_rejects_impossible_day() {
        assert!(parse_day_first("31/02/2024").is_none());
    }
}
