//! Provider port: the remote source of truth for tasks and links.

use crate::{
    config::ProviderConfig,
    task::{
        domain::{Link, LinkDraft, LinkId, Task, TaskDraft, TaskId, TaskPatch},
        ordering::ReorderPosition,
        validation::LinkDeletion,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Filters applied to a full synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Only tasks carrying all of these labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Only tasks in this milestone.
    #[serde(default)]
    pub milestone: Option<String>,
    /// Only tasks assigned to this user.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Include closed tasks.
    #[serde(default)]
    pub include_closed: bool,
}

impl SyncOptions {
    /// Restricts the sync to tasks carrying `label`.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Restricts the sync to one milestone.
    #[must_use]
    pub fn with_milestone(mut self, milestone: impl Into<String>) -> Self {
        self.milestone = Some(milestone.into());
        self
    }

    /// Includes closed tasks.
    #[must_use]
    pub const fn including_closed(mut self) -> Self {
        self.include_closed = true;
        self
    }
}

/// Provider bookkeeping returned alongside a sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMetadata {
    /// Instant the provider produced the snapshot.
    #[serde(default)]
    pub synced_at: Option<DateTime<Utc>>,
    /// `true` when the provider capped the result set.
    #[serde(default)]
    pub truncated: bool,
}

/// Full task graph returned by [`TaskProvider::sync`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    /// Every task matching the sync options.
    pub tasks: Vec<Task>,
    /// Every link between those tasks.
    pub links: Vec<Link>,
    /// Provider bookkeeping.
    #[serde(default)]
    pub metadata: SyncMetadata,
}

/// Values offered by the provider for the sync filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Known labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Known milestone titles.
    #[serde(default)]
    pub milestones: Vec<String>,
    /// Known assignees.
    #[serde(default)]
    pub assignees: Vec<String>,
}

/// Everything a provider needs to remove a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDeletionRequest {
    /// Local link identifier.
    pub link_id: LinkId,
    /// Predecessor task.
    pub source_id: TaskId,
    /// Successor task.
    pub target_id: TaskId,
    /// Provider-side reference of the link.
    pub deletion: LinkDeletion,
    /// Sync options in effect, for providers that rewrite task metadata.
    pub options: SyncOptions,
}

/// Remote task tracker contract.
///
/// Every write returns the provider's canonical version of the entity,
/// which replaces the optimistic local copy.
#[async_trait]
pub trait TaskProvider: Send + Sync {
    /// Fetches the full task graph.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] on communication failure.
    async fn sync(&self, options: &SyncOptions) -> ProviderResult<SyncSnapshot>;

    /// Persists a partial update and returns the canonical task.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when the task is unknown remotely.
    async fn sync_task(&self, id: TaskId, patch: &TaskPatch) -> ProviderResult<Task>;

    /// Creates a task; the provider assigns its identifier.
    async fn create_task(&self, draft: &TaskDraft) -> ProviderResult<Task>;

    /// Deletes a task.
    async fn delete_task(&self, id: TaskId) -> ProviderResult<()>;

    /// Creates a link; the provider assigns its identifier and record.
    async fn create_link(&self, draft: &LinkDraft) -> ProviderResult<Link>;

    /// Deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::LinkNotFound`] when the reference is stale.
    async fn delete_link(&self, request: &LinkDeletionRequest) -> ProviderResult<()>;

    /// Moves `moved` next to `anchor` in the provider's ordering.
    async fn reorder_task(
        &self,
        moved: TaskId,
        anchor: TaskId,
        position: ReorderPosition,
    ) -> ProviderResult<()>;

    /// Returns the values available for sync filters.
    async fn filter_options(&self) -> ProviderResult<FilterOptions>;

    /// Returns `true` when the current user may write.
    async fn check_can_edit(&self) -> ProviderResult<bool>;

    /// Returns the static provider configuration.
    fn config(&self) -> ProviderConfig;
}

/// Errors returned by provider implementations.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The task does not exist remotely.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The link reference no longer matches the remote state.
    #[error("link not found: {0}")]
    LinkNotFound(LinkId),

    /// The provider refused the change.
    #[error("rejected by provider: {0}")]
    Rejected(String),

    /// The current user may not write.
    #[error("permission denied")]
    PermissionDenied,

    /// Communication failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Wraps a transport error.
    #[must_use]
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
