//! Errors surfaced by the orchestrator.

use super::{LedgerError, MutationId, Notification};
use crate::task::{
    domain::{LinkId, TaskDomainError, TaskId},
    ordering::ReorderError,
    ports::ProviderError,
    scheduling::CascadeError,
    validation::LinkValidationError,
};
use thiserror::Error;

/// Coarse classification of [`SyncError`] for UI handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncErrorKind {
    /// The command was rejected before any local change.
    Validation,
    /// The provider failed; local state was reverted or resynchronized.
    Persistence,
    /// A link could not be deleted because it was never synchronized.
    StaleMetadata,
}

/// Errors returned by [`super::SyncOrchestrator::dispatch`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// Link validation failed.
    #[error(transparent)]
    Link(#[from] LinkValidationError),

    /// No valid reorder anchor exists.
    #[error(transparent)]
    Reorder(#[from] ReorderError),

    /// Dates could not be computed.
    #[error(transparent)]
    Schedule(#[from] CascadeError),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The task is not part of the working set.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),

    /// The link is not part of the working set.
    #[error("link not found: {0}")]
    UnknownLink(LinkId),

    /// Save or cancel without an open editor.
    #[error("no editor session is open")]
    NoEditorSession,

    /// The editor is already open for another task.
    #[error("the editor is already open for task {0}")]
    EditorBusy(TaskId),

    /// The provider does not accept writes.
    #[error("the board is read-only")]
    ReadOnly,

    /// The provider failed to persist a change.
    #[error("{operation} failed: {source}")]
    Persistence {
        /// Operation that failed.
        operation: &'static str,
        /// Ledger entry of the failed change, kept for retry.
        mutation: Option<MutationId>,
        /// `true` when the store was reloaded from the provider.
        resynced: bool,
        /// Provider error.
        source: ProviderError,
    },

    /// The link has no provider record even after a resync.
    #[error("link {0} has not been synchronized yet; refresh and try again")]
    StaleMetadata(LinkId),

    /// Ledger bookkeeping failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SyncError {
    /// Returns the coarse classification.
    #[must_use]
    pub const fn kind(&self) -> SyncErrorKind {
        match self {
            Self::Persistence { .. } => SyncErrorKind::Persistence,
            Self::StaleMetadata(_) => SyncErrorKind::StaleMetadata,
            _ => SyncErrorKind::Validation,
        }
    }

    /// Returns the ledger entry kept for retry, if any.
    #[must_use]
    pub const fn mutation(&self) -> Option<MutationId> {
        match self {
            Self::Persistence { mutation, .. } => *mutation,
            _ => None,
        }
    }

    /// Wraps a provider failure that left no change behind.
    pub(crate) const fn provider(operation: &'static str, source: ProviderError) -> Self {
        Self::Persistence {
            operation,
            mutation: None,
            resynced: false,
            source,
        }
    }

    /// Renders the error as an error notification.
    #[must_use]
    pub fn to_notification(&self) -> Notification {
        Notification::error(self.to_string())
    }
}
