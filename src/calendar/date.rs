//! Textual date normalization.

use super::CalendarError;
use chrono::NaiveDate;

/// Parses a calendar date written as `YYYY-MM-DD`, `YYYY-M-D` or `YYYY/M/D`.
///
/// Any trailing time component (`2025-01-08T00:00:00Z`) is ignored so that
/// provider timestamps can be used as plain dates.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidDate`] when the value does not contain
/// exactly three numeric segments forming a valid date.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use trellis::calendar::parse_calendar_date;
///
/// let date = parse_calendar_date("2025/1/8").expect("valid date");
/// assert_eq!(Some(date), NaiveDate::from_ymd_opt(2025, 1, 8));
/// ```
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, CalendarError> {
    let invalid = || CalendarError::InvalidDate(value.to_owned());
    let date_part = value.trim().split('T').next().unwrap_or_default();
    let normalized = date_part.replace('/', "-");
    let mut segments = normalized.split('-');

    let year = parse_segment::<i32>(segments.next()).ok_or_else(invalid)?;
    let month = parse_segment::<u32>(segments.next()).ok_or_else(invalid)?;
    let day = parse_segment::<u32>(segments.next()).ok_or_else(invalid)?;
    if segments.next().is_some() {
        return Err(invalid());
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn parse_segment<T: std::str::FromStr>(segment: Option<&str>) -> Option<T> {
    segment
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse().ok())
}
