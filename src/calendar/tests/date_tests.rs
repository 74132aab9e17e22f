//! Tests for textual date normalization.

use crate::calendar::{CalendarError, parse_calendar_date};
use chrono::NaiveDate;
use rstest::rstest;

#[rstest]
#[case("2025-01-08")]
#[case("2025/1/8")]
#[case("2025-1-8")]
#[case(" 2025/01/08 ")]
#[case("2025-01-08T09:30:00Z")]
fn parse_calendar_date_normalizes_separators(#[case] raw: &str) {
    let expected = NaiveDate::from_ymd_opt(2025, 1, 8);
    assert_eq!(parse_calendar_date(raw).ok(), expected);
}

#[rstest]
#[case("")]
#[case("2025-13-01")]
#[case("2025/02/30")]
#[case("2025-01")]
#[case("2025-01-08-01")]
#[case("next tuesday")]
fn parse_calendar_date_rejects_malformed_input(#[case] raw: &str) {
    assert_eq!(
        parse_calendar_date(raw),
        Err(CalendarError::InvalidDate(raw.to_owned()))
    );
}
