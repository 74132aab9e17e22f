//! Error types for link validation.

use crate::task::domain::{LinkId, TaskId};
use thiserror::Error;

/// Reasons a link proposal or deletion is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkValidationError {
    /// The source or target id is missing (zero).
    #[error("link source and target are both required")]
    MissingEndpoint,

    /// An endpoint is not part of the working set.
    #[error("link endpoint {0} is not a known task")]
    InvalidEndpoint(u64),

    /// The link joins a task to itself.
    #[error("task {0} cannot depend on itself")]
    SelfLink(TaskId),

    /// The endpoint subtype cannot take part in dependency links.
    #[error("task {id} is a {kind} and cannot be linked")]
    UnsupportedEndpoint {
        /// Rejected endpoint.
        id: TaskId,
        /// Subtype name of the endpoint.
        kind: &'static str,
    },

    /// An identical link already exists.
    #[error("a link from {source_id} to {target_id} already exists")]
    Duplicate {
        /// Predecessor task.
        source_id: TaskId,
        /// Successor task.
        target_id: TaskId,
    },

    /// The link would close a dependency cycle.
    #[error("a link from {source_id} to {target_id} would create a dependency cycle")]
    Cycle {
        /// Predecessor task.
        source_id: TaskId,
        /// Successor task.
        target_id: TaskId,
    },

    /// The link has no complete provider record yet.
    #[error("link {0} has incomplete provider metadata")]
    IncompleteMetadata(LinkId),
}
