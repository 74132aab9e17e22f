//! Error types for task domain validation and parsing.

use super::TaskId;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is zero.
    #[error("invalid task id {0}, expected a positive integer")]
    InvalidTaskId(u64),

    /// The link identifier is zero.
    #[error("invalid link id {0}, expected a positive integer")]
    InvalidLinkId(u64),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The end date precedes the start date.
    #[error("task {id} ends on {end}, before its start {start}")]
    EndBeforeStart {
        /// Task whose schedule was rejected.
        id: TaskId,
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// A task draft ends before it starts.
    #[error("new task ends on {end}, before its start {start}")]
    DraftEndBeforeStart {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// A link joins a task to itself.
    #[error("task {0} cannot depend on itself")]
    SelfLink(TaskId),

    /// The referenced parent task is not part of the working set.
    #[error("parent task {0} does not exist")]
    UnknownParent(TaskId),

    /// The task still has children and cannot be deleted.
    #[error("task {0} still has child tasks")]
    HasChildren(TaskId),
}

/// Error returned while parsing textual task enumerations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseTaskEnumError {
    /// Name of the enumeration being parsed.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

impl ParseTaskEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
