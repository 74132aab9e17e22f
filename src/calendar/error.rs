//! Error types for calendar configuration and arithmetic.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while building or querying a work calendar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalendarError {
    /// A textual date could not be parsed.
    #[error("invalid calendar date '{0}', expected YYYY-MM-DD or YYYY/M/D")]
    InvalidDate(String),

    /// Date arithmetic left the representable range.
    #[error("date arithmetic overflowed starting from {0}")]
    DateOutOfRange(NaiveDate),
}
