//! User intents accepted by the orchestrator and their outcomes.

use super::{MutationId, Notification};
use crate::task::{
    domain::{LinkId, TaskDraft, TaskId, TaskPatch},
    ordering::ReorderPosition,
    ports::SyncOptions,
    validation::LinkProposal,
};
use chrono::NaiveDate;

/// A typed user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A task bar was dragged to new dates. The end is corrected to keep the
    /// task's workday count when workday preservation is enabled.
    MoveTask {
        /// Dragged task.
        id: TaskId,
        /// Start date at the drop position.
        start: NaiveDate,
        /// End date at the drop position.
        end: Option<NaiveDate>,
    },
    /// A task bar was resized; only the end changes.
    ResizeTask {
        /// Resized task.
        id: TaskId,
        /// New end date.
        end: NaiveDate,
    },
    /// Dates entered explicitly, applied as given.
    RescheduleTask {
        /// Rescheduled task.
        id: TaskId,
        /// New start date.
        start: NaiveDate,
        /// New end date.
        end: Option<NaiveDate>,
    },
    /// A parent was moved together with all of its descendants.
    CascadeMove {
        /// Moved parent.
        parent: TaskId,
        /// Signed shift in calendar days.
        diff_days: i64,
    },
    /// A task was dropped next to a sibling.
    Reorder {
        /// Dragged task.
        moved: TaskId,
        /// Drop target.
        target: TaskId,
        /// Requested side of the target.
        position: ReorderPosition,
    },
    /// A dependency link was drawn.
    CreateLink(LinkProposal),
    /// A dependency link was removed.
    DeleteLink(LinkId),
    /// A task was created.
    CreateTask(TaskDraft),
    /// A task was deleted.
    DeleteTask(TaskId),
    /// The editor was opened for a task.
    OpenEditor(TaskId),
    /// Fields were edited. Date fields persist at once; other fields are
    /// buffered while the editor is open for the task.
    EditFields {
        /// Edited task.
        id: TaskId,
        /// Edited fields.
        patch: TaskPatch,
    },
    /// The editor was saved.
    SaveEditor,
    /// The editor was closed without saving.
    CancelEditor,
    /// The board requested a full reload.
    Refresh(SyncOptions),
    /// A failed change should be sent again.
    Retry(MutationId),
    /// A failed change should be forgotten.
    Discard(MutationId),
}

impl Command {
    /// Returns a short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MoveTask { .. } => "move_task",
            Self::ResizeTask { .. } => "resize_task",
            Self::RescheduleTask { .. } => "reschedule_task",
            Self::CascadeMove { .. } => "cascade_move",
            Self::Reorder { .. } => "reorder",
            Self::CreateLink(_) => "create_link",
            Self::DeleteLink(_) => "delete_link",
            Self::CreateTask(_) => "create_task",
            Self::DeleteTask(_) => "delete_task",
            Self::OpenEditor(_) => "open_editor",
            Self::EditFields { .. } => "edit_fields",
            Self::SaveEditor => "save_editor",
            Self::CancelEditor => "cancel_editor",
            Self::Refresh(_) => "refresh",
            Self::Retry(_) => "retry",
            Self::Discard(_) => "discard",
        }
    }

    /// Returns `true` when the command needs write access to the provider.
    #[must_use]
    pub const fn writes(&self) -> bool {
        !matches!(
            self,
            Self::OpenEditor(_) | Self::CancelEditor | Self::Refresh(_) | Self::Discard(_)
        )
    }
}

/// Result of a successfully dispatched command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Store version after the command.
    pub version: u64,
    /// Tasks whose local state changed.
    pub affected: Vec<TaskId>,
    /// Messages for the UI.
    pub notifications: Vec<Notification>,
    /// `true` when the store was reloaded from the provider.
    pub resynced: bool,
    /// Ledger entry recording the change, if one was made.
    pub mutation: Option<MutationId>,
}

impl CommandOutcome {
    /// Creates an outcome with nothing changed.
    #[must_use]
    pub fn unchanged(version: u64) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// Returns `true` when the command changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.affected.is_empty() && !self.resynced && self.mutation.is_none()
    }

    /// Adds affected tasks.
    #[must_use]
    pub fn with_affected(mut self, affected: impl IntoIterator<Item = TaskId>) -> Self {
        self.affected.extend(affected);
        self
    }

    /// Adds a notification.
    #[must_use]
    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notifications.push(notification);
        self
    }

    /// Records the ledger entry.
    #[must_use]
    pub const fn with_mutation(mut self, mutation: MutationId) -> Self {
        self.mutation = Some(mutation);
        self
    }

    /// Folds the outcome of a follow-up step into this one.
    #[must_use]
    pub fn absorb(mut self, later: Self) -> Self {
        self.version = later.version;
        for id in later.affected {
            if !self.affected.contains(&id) {
                self.affected.push(id);
            }
        }
        self.notifications.extend(later.notifications);
        self.resynced |= later.resynced;
        self.mutation = later.mutation.or(self.mutation);
        self
    }

    /// Marks the outcome as resynchronized.
    #[must_use]
    pub const fn resynced(mut self) -> Self {
        self.resynced = true;
        self
    }
}
