//! Domain model for the task graph.
//!
//! Tasks, dependency links, partial updates, and the versioned store that
//! owns them. All infrastructure concerns stay outside of this boundary.

mod error;
mod ids;
mod kind;
mod link;
mod patch;
mod source;
mod store;
mod task;

pub use error::{ParseTaskEnumError, TaskDomainError};
pub use ids::{LinkId, TaskId};
pub use kind::{OrderClass, TaskKind};
pub use link::{Link, LinkDraft, LinkKind, LinkProvenance, LinkRecord, MetadataRelation};
pub use patch::TaskPatch;
pub use source::{ProviderKind, ProviderSource};
pub use store::TaskStore;
pub use task::{Task, TaskDraft};
