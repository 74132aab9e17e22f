//! Error types for schedule planning.

use crate::{calendar::CalendarError, task::domain::TaskId};
use thiserror::Error;

/// Reasons a reschedule or cascade cannot be planned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CascadeError {
    /// The task is not part of the working set.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),

    /// The task has no start date to shift from.
    #[error("task {0} has no start date")]
    MissingStart(TaskId),

    /// Shifting the task left the representable date range.
    #[error("task {0} cannot be shifted that far")]
    DateOutOfRange(TaskId),

    /// Workday arithmetic failed.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
