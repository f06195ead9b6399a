use chrono::{Months, NaiveDate, NaiveDateTime, Utc};

use crate::constants::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::errors::Result;

/// Renders a timestamp in the textual layout stored for created/updated columns.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current UTC time in storage layout.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now().naive_utc())
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)?)
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)?)
}

/// Adds whole years, clamping Feb 29 to Feb 28 on non-leap targets.
pub fn add_years(at: NaiveDateTime, years: u32) -> NaiveDateTime {
    at.checked_add_months(Months::new(years * 12)).unwrap_or(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn afternoon_hours_keep_their_24h_value() {
        assert_eq!(format_timestamp(at(2024, 1, 5, 15, 4, 9)), "2024-01-05 15:04:09");
        assert_eq!(format_timestamp(at(2024, 1, 5, 3, 4, 9)), "2024-01-05 03:04:09");
    }

    #[test]
    fn timestamp_parses_back() {
        let parsed = parse_timestamp("2024-03-01 23:59:00").unwrap();
        assert_eq!(parsed, at(2024, 3, 1, 23, 59, 0));
    }

    #[test]
    fn bad_date_is_a_validation_error() {
        let err = parse_date("2024-13-40").unwrap_err();
        assert!(matches!(err, crate::Error::Validation(_)));
    }

    #[test]
    fn leap_day_plus_one_year_clamps() {
        assert_eq!(add_years(at(2024, 2, 29, 10, 0, 0), 1), at(2025, 2, 28, 10, 0, 0));
    }
}
