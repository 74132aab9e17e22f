//! Error types for reorder resolution.

use super::ReorderPosition;
use crate::task::domain::TaskId;
use thiserror::Error;

/// Reasons a reorder request cannot be turned into a provider call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReorderError {
    /// A referenced task is not part of the working set.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),

    /// The dragged task and the drop target have different parents.
    #[error("tasks {moved} and {target} are not siblings")]
    NotSiblings {
        /// Dragged task.
        moved: TaskId,
        /// Drop target.
        target: TaskId,
    },

    /// No sibling of a compatible kind exists to anchor the move.
    #[error("no sibling can anchor task {moved} {position} task {target}")]
    NoCompatibleAnchor {
        /// Dragged task.
        moved: TaskId,
        /// Drop target.
        target: TaskId,
        /// Requested position relative to the target.
        position: ReorderPosition,
    },
}
