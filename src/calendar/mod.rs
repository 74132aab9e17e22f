//! Workday and holiday arithmetic.
//!
//! The calendar engine decides whether a date is a working day and converts
//! between date spans and workday counts. It is configured with a holiday
//! list and a workday-override list (weekend dates forced to working). A
//! listed holiday is always non-working, even when the same date also
//! appears as an override.

mod date;
mod error;
mod work_calendar;

pub use date::parse_calendar_date;
pub use error::CalendarError;
pub use work_calendar::{Holiday, WorkCalendar};

#[cfg(test)]
mod tests;
