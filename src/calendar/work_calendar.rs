//! Work calendar aggregate.

use super::{CalendarError, parse_calendar_date};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A non-working calendar date, optionally named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Date of the holiday.
    pub date: NaiveDate,
    /// Display name such as "New Year".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Holiday {
    /// Creates an unnamed holiday.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self { date, name: None }
    }

    /// Creates a holiday from textual input, normalizing separators.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDate`] when `date` cannot be parsed.
    pub fn parse(date: &str, name: Option<String>) -> Result<Self, CalendarError> {
        Ok(Self {
            date: parse_calendar_date(date)?,
            name: name.filter(|value| !value.trim().is_empty()),
        })
    }
}

/// Holiday and workday-override configuration used for workday arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkCalendar {
    holidays: BTreeMap<NaiveDate, Option<String>>,
    workday_overrides: BTreeSet<NaiveDate>,
}

impl WorkCalendar {
    /// Creates a calendar from holidays and weekend dates forced to working.
    #[must_use]
    pub fn new(
        holidays: impl IntoIterator<Item = Holiday>,
        workday_overrides: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            holidays: holidays
                .into_iter()
                .map(|holiday| (holiday.date, holiday.name))
                .collect(),
            workday_overrides: workday_overrides.into_iter().collect(),
        }
    }

    /// Returns the configured holidays in date order.
    pub fn holidays(&self) -> impl Iterator<Item = Holiday> + '_ {
        self.holidays.iter().map(|(date, name)| Holiday {
            date: *date,
            name: name.clone(),
        })
    }

    /// Returns the configured workday overrides in date order.
    pub fn workday_overrides(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.workday_overrides.iter().copied()
    }

    /// Returns `true` for Saturdays and Sundays that are not overridden as
    /// working days.
    #[must_use]
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            && !self.workday_overrides.contains(&date)
    }

    /// Returns `true` when the date is a listed holiday.
    #[must_use]
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }

    /// Textual variant of [`Self::is_holiday`]; unparseable input is never a
    /// holiday.
    #[must_use]
    pub fn is_holiday_str(&self, date: &str) -> bool {
        parse_calendar_date(date).is_ok_and(|parsed| self.is_holiday(parsed))
    }

    /// Returns the holiday name for the date, if it is a named holiday.
    #[must_use]
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).and_then(Option::as_deref)
    }

    /// Returns `true` for weekends and holidays.
    ///
    /// Holidays stay non-working even when also listed as workday overrides.
    #[must_use]
    pub fn is_non_workday(&self, date: NaiveDate) -> bool {
        self.is_weekend(date) || self.is_holiday(date)
    }

    /// Returns `true` when the date is a working day.
    #[must_use]
    pub fn is_workday(&self, date: NaiveDate) -> bool {
        !self.is_non_workday(date)
    }

    /// Counts workdays in the inclusive range `start..=end`.
    ///
    /// Returns `0` when either bound is absent or `start > end`.
    #[must_use]
    pub fn count_workdays(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> i64 {
        let (Some(first), Some(last)) = (start, end) else {
            return 0;
        };
        let mut count = 0;
        for day in first.iter_days() {
            if day > last {
                break;
            }
            if self.is_workday(day) {
                count += 1;
            }
        }
        count
    }

    /// Returns the first workday on or after `date`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::DateOutOfRange`] if no workday is
    /// representable after `date`.
    pub fn next_workday(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        let mut current = date;
        while self.is_non_workday(current) {
            current = current
                .succ_opt()
                .ok_or(CalendarError::DateOutOfRange(date))?;
        }
        Ok(current)
    }

    /// Returns the date on which the `workdays`-th working day falls,
    /// counting from the first workday on or after `start`.
    ///
    /// For `workdays <= 0` the start date is returned unchanged. The result
    /// always satisfies `count_workdays(start, result) == workdays` for
    /// positive counts.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::DateOutOfRange`] when the walk runs past the
    /// last representable date.
    pub fn end_date_by_workdays(
        &self,
        start: NaiveDate,
        workdays: i64,
    ) -> Result<NaiveDate, CalendarError> {
        if workdays <= 0 {
            return Ok(start);
        }
        let mut current = self.next_workday(start)?;
        let mut counted = 1;
        while counted < workdays {
            current = current
                .succ_opt()
                .ok_or(CalendarError::DateOutOfRange(start))?;
            if self.is_workday(current) {
                counted += 1;
            }
        }
        Ok(current)
    }
}
