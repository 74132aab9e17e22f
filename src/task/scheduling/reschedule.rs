//! Workday-preserving reschedule of a single task.

use super::CascadeError;
use crate::{
    calendar::WorkCalendar,
    task::domain::{Task, TaskPatch},
};
use chrono::{NaiveDate, TimeDelta};

/// Shifts a date by a signed number of calendar days.
#[must_use]
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

/// Dates to apply after a task was dragged to a new start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkdayCorrection {
    /// New start date.
    pub start: NaiveDate,
    /// New end date, keeping the original workday count.
    pub end: Option<NaiveDate>,
    /// `true` when `end` differs from the end the user dropped the task on.
    pub corrected: bool,
}

impl WorkdayCorrection {
    /// Returns the schedule patch for the corrected dates.
    #[must_use]
    pub const fn patch(&self) -> TaskPatch {
        TaskPatch::schedule(self.start, self.end)
    }
}

/// Computes the end date that keeps `task`'s workday count when it starts
/// on `new_start`.
///
/// A task with a start but no end takes its explicit duration, if any;
/// otherwise it stays open-ended. A span containing no workday (for example
/// a weekend-only task) keeps its calendar length instead.
pub(crate) fn preserved_end(
    task: &Task,
    calendar: &WorkCalendar,
    new_start: NaiveDate,
) -> Result<Option<NaiveDate>, CascadeError> {
    let Some(start) = task.start() else {
        return Ok(None);
    };
    let workdays = task.workdays(calendar);
    if workdays > 0 {
        return Ok(Some(calendar.end_date_by_workdays(new_start, workdays)?));
    }
    let Some(end) = task.end() else {
        return Ok(None);
    };
    shift_days(new_start, (end - start).num_days())
        .map(Some)
        .ok_or(CascadeError::DateOutOfRange(task.id()))
}

/// Corrects a drag so that the task keeps its workday duration.
///
/// `dropped_end` is the end date implied by the raw drag; the result says
/// whether the workday-preserving end differs from it.
///
/// # Errors
///
/// Returns [`CascadeError::Calendar`] when workday arithmetic overflows.
pub fn correct_move(
    task: &Task,
    calendar: &WorkCalendar,
    new_start: NaiveDate,
    dropped_end: Option<NaiveDate>,
) -> Result<WorkdayCorrection, CascadeError> {
    let end = preserved_end(task, calendar, new_start)?.or(dropped_end);
    Ok(WorkdayCorrection {
        start: new_start,
        end,
        corrected: dropped_end.is_some() && end != dropped_end,
    })
}
