//! Per-entity record of optimistic changes and their persistence state.

use crate::task::{
    domain::{Link, LinkDraft, LinkId, Task, TaskId, TaskPatch},
    ordering::ReorderPlan,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};
use thiserror::Error;
use uuid::Uuid;

/// Identifier of one recorded change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationId(Uuid);

impl MutationId {
    /// Generates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MutationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entity a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "entity", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    /// A task.
    Task(TaskId),
    /// A link.
    Link(LinkId),
}

/// Persistence state of a change.
///
/// Changes move `PendingLocal -> Persisting -> Confirmed`, or
/// `PendingLocal -> Persisting -> Failed -> Reverted` when the provider
/// rejects them. A buffered change that is discarded before persisting goes
/// straight from `PendingLocal` to `Reverted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// Applied locally, not yet sent.
    PendingLocal,
    /// Sent to the provider.
    Persisting,
    /// Accepted by the provider.
    Confirmed,
    /// Rejected by the provider; the local state was rolled back.
    Failed,
    /// Abandoned.
    Reverted,
}

impl SyncPhase {
    /// Returns the canonical storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingLocal => "pending_local",
            Self::Persisting => "persisting",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
            Self::Reverted => "reverted",
        }
    }

    /// Returns `true` when `next` is a permitted successor phase.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::PendingLocal, Self::Persisting | Self::Reverted)
                | (Self::Persisting, Self::Confirmed | Self::Failed)
                | (Self::Failed, Self::Reverted)
        )
    }

    /// Returns `true` when no further transition is possible.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Confirmed | Self::Reverted)
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a change is only visible locally or headed for the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeScope {
    /// Buffered in an open editor session.
    UiOnly,
    /// Persisted immediately.
    Persisted,
}

/// The change itself, with what is needed to roll it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOperation {
    /// A partial task update.
    Update {
        /// Fields written.
        patch: TaskPatch,
        /// Task as it was before the first write.
        snapshot: Task,
    },
    /// Dates of a parent and its descendants.
    Cascade {
        /// Patches in persistence order.
        moves: Vec<(TaskId, TaskPatch)>,
    },
    /// A sibling reorder.
    Reorder(ReorderPlan),
    /// A new link, shown under a provisional id until persisted.
    CreateLink {
        /// Link sent to the provider.
        draft: LinkDraft,
        /// Local id used until the provider assigns one.
        provisional: LinkId,
    },
    /// A link removal.
    DeleteLink(Link),
    /// A task removal with the links that went with it.
    DeleteTask {
        /// Removed task.
        task: Task,
        /// Removed links.
        links: Vec<Link>,
    },
}

impl ChangeOperation {
    /// Returns a short label for logs and notifications.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Update { .. } => "update task",
            Self::Cascade { .. } => "cascade move",
            Self::Reorder(_) => "reorder task",
            Self::CreateLink { .. } => "create link",
            Self::DeleteLink(_) => "delete link",
            Self::DeleteTask { .. } => "delete task",
        }
    }

    /// Returns `true` when the change can be replayed on its own.
    ///
    /// Batch changes are resynchronized on failure instead.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Cascade { .. } | Self::Reorder(_))
    }
}

/// One recorded change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    id: MutationId,
    entity: EntityRef,
    operation: ChangeOperation,
    scope: ChangeScope,
    phase: SyncPhase,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PendingChange {
    /// Returns the change identifier.
    #[must_use]
    pub const fn id(&self) -> MutationId {
        self.id
    }

    /// Returns the changed entity.
    #[must_use]
    pub const fn entity(&self) -> EntityRef {
        self.entity
    }

    /// Returns the change.
    #[must_use]
    pub const fn operation(&self) -> &ChangeOperation {
        &self.operation
    }

    /// Returns the scope.
    #[must_use]
    pub const fn scope(&self) -> ChangeScope {
        self.scope
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Returns when the change was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the change last moved between phases.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the patch of a buffered or persisted update.
    #[must_use]
    pub const fn patch(&self) -> Option<&TaskPatch> {
        match &self.operation {
            ChangeOperation::Update { patch, .. } => Some(patch),
            _ => None,
        }
    }

    const fn is_buffer_for(&self, task: TaskId) -> bool {
        matches!(self.scope, ChangeScope::UiOnly)
            && matches!(self.phase, SyncPhase::PendingLocal)
            && matches!(self.entity, EntityRef::Task(id) if id.value() == task.value())
    }
}

/// Errors raised by ledger bookkeeping.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// No change with this identifier is recorded.
    #[error("unknown change: {0}")]
    UnknownMutation(MutationId),

    /// The phase change is not permitted.
    #[error("change {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Change identifier.
        id: MutationId,
        /// Current phase.
        from: SyncPhase,
        /// Requested phase.
        to: SyncPhase,
    },

    /// Only failed changes can be retried or discarded.
    #[error("change {0} has not failed")]
    NotFailed(MutationId),

    /// The change is a batch that cannot be replayed.
    #[error("change {0} cannot be retried")]
    NotRetryable(MutationId),
}

/// Number of confirmed or reverted changes a ledger keeps for inspection.
pub const SETTLED_HISTORY: usize = 32;

/// Ordered record of optimistic changes.
///
/// Open changes are kept until they settle; settled changes are trimmed to
/// the most recent [`SETTLED_HISTORY`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncLedger {
    changes: Vec<PendingChange>,
}

impl SyncLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a change in `PendingLocal`.
    pub fn record(
        &mut self,
        entity: EntityRef,
        operation: ChangeOperation,
        scope: ChangeScope,
        now: DateTime<Utc>,
    ) -> MutationId {
        let id = MutationId::new();
        self.changes.push(PendingChange {
            id,
            entity,
            operation,
            scope,
            phase: SyncPhase::PendingLocal,
            created_at: now,
            updated_at: now,
        });
        id
    }

    /// Buffers an editor edit for `snapshot`'s task.
    ///
    /// Consecutive edits fold into one UI-only change so that saving the
    /// editor persists them with a single write.
    pub fn buffer(&mut self, snapshot: &Task, patch: TaskPatch, now: DateTime<Utc>) -> MutationId {
        let task = snapshot.id();
        if let Some(change) = self
            .changes
            .iter_mut()
            .find(|change| change.is_buffer_for(task))
            && let ChangeOperation::Update { patch: buffered, .. } = &mut change.operation
        {
            buffered.merge(patch);
            change.updated_at = now;
            return change.id;
        }
        self.record(
            EntityRef::Task(task),
            ChangeOperation::Update {
                patch,
                snapshot: snapshot.clone(),
            },
            ChangeScope::UiOnly,
            now,
        )
    }

    /// Returns the open UI-only change of `task`.
    #[must_use]
    pub fn buffered(&self, task: TaskId) -> Option<&PendingChange> {
        self.changes.iter().find(|change| change.is_buffer_for(task))
    }

    /// Returns every open UI-only change.
    pub fn buffers(&self) -> impl Iterator<Item = &PendingChange> {
        self.changes.iter().filter(|change| {
            change.scope == ChangeScope::UiOnly && change.phase == SyncPhase::PendingLocal
        })
    }

    /// Looks up a change.
    #[must_use]
    pub fn get(&self, id: MutationId) -> Option<&PendingChange> {
        self.changes.iter().find(|change| change.id == id)
    }

    /// Moves a change to `next`.
    ///
    /// A buffered change entering `Persisting` becomes a persisted change.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownMutation`] or
    /// [`LedgerError::InvalidTransition`].
    pub fn transition(
        &mut self,
        id: MutationId,
        next: SyncPhase,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let change = self
            .changes
            .iter_mut()
            .find(|change| change.id == id)
            .ok_or(LedgerError::UnknownMutation(id))?;
        if !change.phase.can_transition_to(next) {
            return Err(LedgerError::InvalidTransition {
                id,
                from: change.phase,
                to: next,
            });
        }
        change.phase = next;
        change.updated_at = now;
        if next == SyncPhase::Persisting {
            change.scope = ChangeScope::Persisted;
        }
        if next.is_settled() {
            self.trim_settled();
        }
        Ok(())
    }

    /// Returns the operation of a failed change.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownMutation`] or [`LedgerError::NotFailed`].
    pub fn failed(&self, id: MutationId) -> Result<&ChangeOperation, LedgerError> {
        let change = self.get(id).ok_or(LedgerError::UnknownMutation(id))?;
        if change.phase != SyncPhase::Failed {
            return Err(LedgerError::NotFailed(id));
        }
        Ok(&change.operation)
    }

    /// Returns the operation of a failed change that can be replayed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownMutation`], [`LedgerError::NotFailed`]
    /// or [`LedgerError::NotRetryable`].
    pub fn retryable(&self, id: MutationId) -> Result<&ChangeOperation, LedgerError> {
        let operation = self.failed(id)?;
        if !operation.is_retryable() {
            return Err(LedgerError::NotRetryable(id));
        }
        Ok(operation)
    }

    /// Iterates changes in recording order.
    pub fn changes(&self) -> impl Iterator<Item = &PendingChange> {
        self.changes.iter()
    }

    /// Returns the number of changes not yet settled.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|change| !change.phase.is_settled())
            .count()
    }

    /// Drops confirmed and reverted changes.
    pub fn prune_settled(&mut self) {
        self.changes.retain(|change| !change.phase.is_settled());
    }

    fn trim_settled(&mut self) {
        let settled: Vec<MutationId> = self
            .changes
            .iter()
            .filter(|change| change.phase.is_settled())
            .map(|change| change.id)
            .collect();
        let excess = settled.len().saturating_sub(SETTLED_HISTORY);
        if excess == 0 {
            return;
        }
        let dropped: BTreeSet<MutationId> = settled.into_iter().take(excess).collect();
        self.changes.retain(|change| !dropped.contains(&change.id));
    }
}
