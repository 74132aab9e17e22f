//! Application services that keep the task graph in sync with a provider.

mod command;
mod error;
mod ledger;
mod notification;
mod orchestrator;

pub use command::{Command, CommandOutcome};
pub use error::{SyncError, SyncErrorKind};
pub use ledger::{
    ChangeOperation, ChangeScope, EntityRef, LedgerError, MutationId, PendingChange, SETTLED_HISTORY,
    SyncLedger, SyncPhase,
};
pub use notification::{Notification, NotificationLevel};
pub use orchestrator::{SyncOrchestrator, SyncResult};
