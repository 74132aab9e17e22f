//! In-memory provider with failure injection and a call log.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    config::ProviderConfig,
    task::{
        domain::{
            Link, LinkDraft, LinkId, LinkRecord, MetadataRelation, ProviderKind, ProviderSource,
            Task, TaskDraft, TaskId, TaskPatch, TaskStore,
        },
        ordering::{ReorderPlan, ReorderPosition, renumber},
        ports::{
            FilterOptions, LinkDeletionRequest, ProviderError, ProviderResult, SyncMetadata,
            SyncOptions, SyncSnapshot, TaskProvider,
        },
    },
};

/// Provider operations that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOperation {
    /// [`TaskProvider::sync`].
    Sync,
    /// [`TaskProvider::sync_task`].
    SyncTask,
    /// [`TaskProvider::create_task`].
    CreateTask,
    /// [`TaskProvider::delete_task`].
    DeleteTask,
    /// [`TaskProvider::create_link`].
    CreateLink,
    /// [`TaskProvider::delete_link`].
    DeleteLink,
    /// [`TaskProvider::reorder_task`].
    ReorderTask,
}

/// One recorded provider call, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    /// Full synchronization.
    Sync,
    /// Task update.
    SyncTask {
        /// Updated task.
        id: TaskId,
        /// Patch sent.
        patch: TaskPatch,
    },
    /// Task creation, by title.
    CreateTask(String),
    /// Task deletion.
    DeleteTask(TaskId),
    /// Link creation.
    CreateLink(LinkDraft),
    /// Link deletion.
    DeleteLink(LinkId),
    /// Sibling reorder.
    ReorderTask {
        /// Moved task.
        moved: TaskId,
        /// Anchor sibling.
        anchor: TaskId,
        /// Side of the anchor.
        position: ReorderPosition,
    },
}

#[derive(Debug)]
struct ScriptedFailure {
    operation: ProviderOperation,
    task: Option<TaskId>,
    error: ProviderError,
}

#[derive(Debug)]
struct ProviderState {
    tasks: BTreeMap<TaskId, Task>,
    links: BTreeMap<LinkId, Link>,
    failures: Vec<ScriptedFailure>,
    calls: Vec<ProviderCall>,
    can_edit: bool,
    filter_options: FilterOptions,
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            links: BTreeMap::new(),
            failures: Vec::new(),
            calls: Vec::new(),
            can_edit: true,
            filter_options: FilterOptions::default(),
        }
    }
}

impl ProviderState {
    /// Records `call` and consumes the first scripted failure matching it.
    fn enter(
        &mut self,
        call: ProviderCall,
        operation: ProviderOperation,
        task: Option<TaskId>,
    ) -> ProviderResult<()> {
        self.calls.push(call);
        let scripted = self.failures.iter().position(|failure| {
            failure.operation == operation && (failure.task.is_none() || failure.task == task)
        });
        match scripted {
            Some(index) => Err(self.failures.remove(index).error),
            None => Ok(()),
        }
    }

    fn next_task_id(&self) -> ProviderResult<TaskId> {
        let last = self.tasks.keys().next_back().map_or(0, |id| id.value());
        TaskId::new(last.saturating_add(1)).map_err(|err| ProviderError::Rejected(err.to_string()))
    }

    fn next_link_id(&self) -> ProviderResult<LinkId> {
        let last = self.links.keys().next_back().map_or(0, |id| id.value());
        LinkId::new(last.saturating_add(1)).map_err(|err| ProviderError::Rejected(err.to_string()))
    }
}

/// Thread-safe in-memory task provider.
///
/// Writes behave like a well-behaved remote tracker: identifiers are
/// assigned on creation and every write returns the stored entity. Failures
/// are scripted per operation (optionally per task) and fire once.
#[derive(Debug, Clone)]
pub struct InMemoryTaskProvider {
    state: Arc<RwLock<ProviderState>>,
    config: ProviderConfig,
}

impl Default for InMemoryTaskProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskProvider {
    /// Creates an empty, writable local provider.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ProviderConfig::new(ProviderKind::Local, "local"))
    }

    /// Creates an empty provider reporting `config`.
    #[must_use]
    pub fn with_config(config: ProviderConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(ProviderState::default())),
            config,
        }
    }

    fn read(&self) -> ProviderResult<RwLockReadGuard<'_, ProviderState>> {
        self.state
            .read()
            .map_err(|err| ProviderError::transport(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> ProviderResult<RwLockWriteGuard<'_, ProviderState>> {
        self.state
            .write()
            .map_err(|err| ProviderError::transport(std::io::Error::other(err.to_string())))
    }

    /// Stores a task as if it already existed remotely.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the state lock is poisoned.
    pub fn seed_task(&self, task: Task) -> ProviderResult<()> {
        self.write()?.tasks.insert(task.id(), task);
        Ok(())
    }

    /// Stores a link as if it already existed remotely.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the state lock is poisoned.
    pub fn seed_link(&self, link: Link) -> ProviderResult<()> {
        self.write()?.links.insert(link.id(), link);
        Ok(())
    }

    /// Makes the next call of `operation` fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the state lock is poisoned.
    pub fn fail_next(&self, operation: ProviderOperation, error: ProviderError) -> ProviderResult<()> {
        self.write()?.failures.push(ScriptedFailure {
            operation,
            task: None,
            error,
        });
        Ok(())
    }

    /// Makes the next call of `operation` concerning `task` fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the state lock is poisoned.
    pub fn fail_next_for(
        &self,
        operation: ProviderOperation,
        task: TaskId,
        error: ProviderError,
    ) -> ProviderResult<()> {
        self.write()?.failures.push(ScriptedFailure {
            operation,
            task: Some(task),
            error,
        });
        Ok(())
    }

    /// Sets the answer of [`TaskProvider::check_can_edit`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the state lock is poisoned.
    pub fn set_can_edit(&self, can_edit: bool) -> ProviderResult<()> {
        self.write()?.can_edit = can_edit;
        Ok(())
    }

    /// Sets the answer of [`TaskProvider::filter_options`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the state lock is poisoned.
    pub fn set_filter_options(&self, options: FilterOptions) -> ProviderResult<()> {
        self.write()?.filter_options = options;
        Ok(())
    }

    /// Returns the calls received so far.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the state lock is poisoned.
    pub fn calls(&self) -> ProviderResult<Vec<ProviderCall>> {
        Ok(self.read()?.calls.clone())
    }

    /// Returns the remote copy of a task.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the state lock is poisoned.
    pub fn remote_task(&self, id: TaskId) -> ProviderResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    /// Returns the remote copy of a link.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the state lock is poisoned.
    pub fn remote_link(&self, id: LinkId) -> ProviderResult<Option<Link>> {
        Ok(self.read()?.links.get(&id).cloned())
    }
}

fn matches_options(task: &Task, options: &SyncOptions) -> bool {
    options
        .labels
        .iter()
        .all(|wanted| task.labels().iter().any(|label| label == wanted))
}

#[async_trait]
impl TaskProvider for InMemoryTaskProvider {
    async fn sync(&self, options: &SyncOptions) -> ProviderResult<SyncSnapshot> {
        let mut state = self.write()?;
        state.enter(ProviderCall::Sync, ProviderOperation::Sync, None)?;
        let tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| matches_options(task, options))
            .cloned()
            .collect();
        let included: Vec<TaskId> = tasks.iter().map(Task::id).collect();
        let links = state
            .links
            .values()
            .filter(|link| included.contains(&link.source()) && included.contains(&link.target()))
            .cloned()
            .collect();
        Ok(SyncSnapshot {
            tasks,
            links,
            metadata: SyncMetadata::default(),
        })
    }

    async fn sync_task(&self, id: TaskId, patch: &TaskPatch) -> ProviderResult<Task> {
        let mut state = self.write()?;
        state.enter(
            ProviderCall::SyncTask {
                id,
                patch: patch.clone(),
            },
            ProviderOperation::SyncTask,
            Some(id),
        )?;
        let task = state.tasks.get_mut(&id).ok_or(ProviderError::NotFound(id))?;
        let mut updated = task.clone();
        patch
            .apply_to(&mut updated)
            .map_err(|err| ProviderError::Rejected(err.to_string()))?;
        *task = updated.clone();
        Ok(updated)
    }

    async fn create_task(&self, draft: &TaskDraft) -> ProviderResult<Task> {
        let mut state = self.write()?;
        state.enter(
            ProviderCall::CreateTask(draft.title.clone()),
            ProviderOperation::CreateTask,
            draft.parent,
        )?;
        draft
            .validate()
            .map_err(|err| ProviderError::Rejected(err.to_string()))?;
        if let Some(parent) = draft.parent
            && !state.tasks.contains_key(&parent)
        {
            return Err(ProviderError::NotFound(parent));
        }
        let id = state.next_task_id()?;
        let mut task = Task::new(id, draft.title.trim(), draft.kind.clone())
            .with_schedule(draft.start, draft.end)
            .map_err(|err| ProviderError::Rejected(err.to_string()))?
            .with_labels(draft.labels.iter().cloned())
            .with_source(ProviderSource::new(self.config.provider, id.to_string()));
        if let Some(parent) = draft.parent {
            task = task.with_parent(parent);
        }
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn delete_task(&self, id: TaskId) -> ProviderResult<()> {
        let mut state = self.write()?;
        state.enter(
            ProviderCall::DeleteTask(id),
            ProviderOperation::DeleteTask,
            Some(id),
        )?;
        state.tasks.remove(&id).ok_or(ProviderError::NotFound(id))?;
        state
            .links
            .retain(|_, link| link.source() != id && link.target() != id);
        Ok(())
    }

    async fn create_link(&self, draft: &LinkDraft) -> ProviderResult<Link> {
        let mut state = self.write()?;
        state.enter(
            ProviderCall::CreateLink(*draft),
            ProviderOperation::CreateLink,
            Some(draft.source),
        )?;
        for endpoint in [draft.source, draft.target] {
            if !state.tasks.contains_key(&endpoint) {
                return Err(ProviderError::NotFound(endpoint));
            }
        }
        if state.links.values().any(|link| link.same_edge(draft)) {
            return Err(ProviderError::Rejected(format!(
                "link {} -> {} already exists",
                draft.source, draft.target
            )));
        }
        let id = state.next_link_id()?;
        // Targets with a project-local number are related through description
        // metadata, like GitLab issues on instances without native links.
        let record = state
            .tasks
            .get(&draft.target)
            .and_then(|target| target.kind().local_number())
            .map_or_else(
                || LinkRecord::native(draft.target.to_string()),
                |iid| LinkRecord::metadata(MetadataRelation::Blocks, iid),
            );
        let link = draft
            .into_link(id)
            .map_err(|err| ProviderError::Rejected(err.to_string()))?
            .with_record(record);
        state.links.insert(id, link.clone());
        Ok(link)
    }

    async fn delete_link(&self, request: &LinkDeletionRequest) -> ProviderResult<()> {
        let mut state = self.write()?;
        state.enter(
            ProviderCall::DeleteLink(request.link_id),
            ProviderOperation::DeleteLink,
            Some(request.source_id),
        )?;
        let known = state.links.get(&request.link_id).is_some_and(|link| {
            link.source() == request.source_id && link.target() == request.target_id
        });
        if !known {
            return Err(ProviderError::LinkNotFound(request.link_id));
        }
        state.links.remove(&request.link_id);
        Ok(())
    }

    async fn reorder_task(
        &self,
        moved: TaskId,
        anchor: TaskId,
        position: ReorderPosition,
    ) -> ProviderResult<()> {
        let mut state = self.write()?;
        state.enter(
            ProviderCall::ReorderTask {
                moved,
                anchor,
                position,
            },
            ProviderOperation::ReorderTask,
            Some(moved),
        )?;
        for id in [moved, anchor] {
            if !state.tasks.contains_key(&id) {
                return Err(ProviderError::NotFound(id));
            }
        }
        let snapshot = TaskStore::from_parts(state.tasks.values().cloned(), Vec::<Link>::new());
        let plan = ReorderPlan {
            moved,
            anchor,
            position,
        };
        for (id, order) in renumber(&snapshot, &plan) {
            if let Some(task) = state.tasks.get_mut(&id) {
                task.set_display_order(Some(order));
            }
        }
        Ok(())
    }

    async fn filter_options(&self) -> ProviderResult<FilterOptions> {
        Ok(self.read()?.filter_options.clone())
    }

    async fn check_can_edit(&self) -> ProviderResult<bool> {
        Ok(self.read()?.can_edit && !self.config.read_only)
    }

    fn config(&self) -> ProviderConfig {
        self.config.clone()
    }
}
