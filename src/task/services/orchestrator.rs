//! Optimistic command processing against a task provider.

use super::{
    ChangeOperation, ChangeScope, Command, CommandOutcome, EntityRef, LedgerError, MutationId,
    Notification, PendingChange, SyncError, SyncLedger, SyncPhase,
};
use crate::{
    calendar::WorkCalendar,
    color_rule::{ColorRule, ColorRuleSet},
    config::{ConfigError, TrellisConfig},
    task::{
        domain::{LinkId, Task, TaskDomainError, TaskDraft, TaskId, TaskPatch, TaskStore},
        ordering::{ReorderPosition, ReorderResolution, renumber, resolve_reorder},
        ports::{FilterOptions, LinkDeletionRequest, ProviderError, SyncOptions, TaskProvider},
        scheduling::{correct_move, plan_cascade},
        validation::{LinkProposal, LinkValidationError, classify_deletion, validate_new_link},
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result type for orchestrator operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Clone)]
struct EditorSession {
    task: TaskId,
    snapshot: Task,
}

/// Owns the task graph and keeps it consistent with a provider.
///
/// Every command is validated and applied to the local store before the
/// provider is called. When the provider rejects a single-task change the
/// touched fields are rolled back and the change stays in the ledger as
/// `Failed` for [`Command::Retry`]. Multi-task changes (cascades and
/// reorders) are reconciled by reloading the graph from the provider.
pub struct SyncOrchestrator<P, C>
where
    P: TaskProvider,
    C: Clock + Send + Sync,
{
    provider: Arc<P>,
    clock: Arc<C>,
    store: TaskStore,
    calendar: WorkCalendar,
    color_rules: ColorRuleSet,
    ledger: SyncLedger,
    editor: Option<EditorSession>,
    preserve_workdays: bool,
    can_edit: bool,
    sync_options: SyncOptions,
}

impl<P, C> SyncOrchestrator<P, C>
where
    P: TaskProvider,
    C: Clock + Send + Sync,
{
    /// Creates an orchestrator with an empty store.
    #[must_use]
    pub fn new(
        provider: Arc<P>,
        clock: Arc<C>,
        calendar: WorkCalendar,
        color_rules: ColorRuleSet,
    ) -> Self {
        let can_edit = !provider.config().read_only;
        Self {
            provider,
            clock,
            store: TaskStore::new(),
            calendar,
            color_rules,
            ledger: SyncLedger::new(),
            editor: None,
            preserve_workdays: true,
            can_edit,
            sync_options: SyncOptions::default(),
        }
    }

    /// Creates an orchestrator from board configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the calendar or colour rules are invalid.
    pub fn from_config(
        provider: Arc<P>,
        clock: Arc<C>,
        config: &TrellisConfig,
    ) -> Result<Self, ConfigError> {
        Ok(
            Self::new(provider, clock, config.calendar()?, config.color_rules()?)
                .with_workday_preservation(config.preserve_workdays_on_move),
        )
    }

    /// Enables or disables workday preservation for dragged tasks.
    #[must_use]
    pub const fn with_workday_preservation(mut self, enabled: bool) -> Self {
        self.preserve_workdays = enabled;
        self
    }

    /// Returns the current task graph.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Returns an owned copy of the task graph.
    #[must_use]
    pub fn snapshot(&self) -> TaskStore {
        self.store.clone()
    }

    /// Returns the change ledger.
    #[must_use]
    pub const fn ledger(&self) -> &SyncLedger {
        &self.ledger
    }

    /// Returns the working calendar.
    #[must_use]
    pub const fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    /// Returns `true` when writes are allowed.
    #[must_use]
    pub const fn can_edit(&self) -> bool {
        self.can_edit
    }

    /// Returns the task the editor is open for.
    #[must_use]
    pub fn editing(&self) -> Option<TaskId> {
        self.editor.as_ref().map(|session| session.task)
    }

    /// Returns the sync options of the last load.
    #[must_use]
    pub const fn sync_options(&self) -> &SyncOptions {
        &self.sync_options
    }

    /// Returns the colour rules shown for a task, at most three, in
    /// ascending priority.
    #[must_use]
    pub fn matching_rules_for(&self, id: TaskId) -> Vec<&ColorRule> {
        self.store
            .task(id)
            .map(|task| self.color_rules.rules_for_task(task))
            .unwrap_or_default()
    }

    /// Loads the task graph and the write permission.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] when the provider cannot be reached.
    pub async fn initialize(&mut self, options: SyncOptions) -> SyncResult<CommandOutcome> {
        self.sync_options = options;
        let writable = self
            .provider
            .check_can_edit()
            .await
            .map_err(|source| SyncError::provider("check permissions", source))?;
        self.can_edit = writable && !self.provider.config().read_only;
        self.reload()
            .await
            .map_err(|source| SyncError::provider("sync", source))?;
        info!(
            tasks = self.store.len(),
            can_edit = self.can_edit,
            "task graph loaded"
        );
        Ok(CommandOutcome::unchanged(self.store.version())
            .with_affected(self.store.task_ids())
            .resynced())
    }

    /// Returns the values the provider offers for sync filters.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] when the provider fails.
    pub async fn filter_options(&self) -> SyncResult<FilterOptions> {
        self.provider
            .filter_options()
            .await
            .map_err(|source| SyncError::provider("load filter options", source))
    }

    /// Executes one user intent.
    ///
    /// Validation failures are returned before the store changes. Provider
    /// failures are returned after the local state was rolled back or
    /// reloaded; [`SyncError::to_notification`] renders them for the UI.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] describing the rejected command.
    pub async fn dispatch(&mut self, command: Command) -> SyncResult<CommandOutcome> {
        let name = command.name();
        info!(command = name, "dispatching command");
        if command.writes() && !self.can_edit {
            return Err(SyncError::ReadOnly);
        }
        let result = match command {
            Command::MoveTask { id, start, end } => self.move_task(id, start, end).await,
            Command::ResizeTask { id, end } => {
                let patch = TaskPatch {
                    end: Some(end),
                    ..TaskPatch::default()
                };
                self.update_task(id, &patch).await
            }
            Command::RescheduleTask { id, start, end } => {
                self.update_task(id, &TaskPatch::schedule(start, end)).await
            }
            Command::CascadeMove { parent, diff_days } => {
                self.cascade_move(parent, diff_days).await
            }
            Command::Reorder {
                moved,
                target,
                position,
            } => self.reorder(moved, target, position).await,
            Command::CreateLink(proposal) => self.create_link(proposal).await,
            Command::DeleteLink(id) => self.delete_link(id).await,
            Command::CreateTask(draft) => self.create_task(&draft).await,
            Command::DeleteTask(id) => self.delete_task(id).await,
            Command::OpenEditor(id) => self.open_editor(id),
            Command::EditFields { id, patch } => self.edit_fields(id, patch).await,
            Command::SaveEditor => self.save_editor().await,
            Command::CancelEditor => self.cancel_editor(),
            Command::Refresh(options) => self.refresh(options).await,
            Command::Retry(mutation) => self.retry(mutation).await,
            Command::Discard(mutation) => self.discard(mutation),
        };
        if let Err(err) = &result {
            warn!(command = name, error = %err, "command failed");
        }
        result
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    fn unchanged(&self) -> CommandOutcome {
        CommandOutcome::unchanged(self.store.version())
    }

    /// Reloads the graph, keeping edits buffered in an open editor.
    async fn reload(&mut self) -> Result<(), ProviderError> {
        let snapshot = self.provider.sync(&self.sync_options).await?;
        let mut tasks = snapshot.tasks;
        for change in self.ledger.buffers() {
            let (EntityRef::Task(id), Some(patch)) = (change.entity(), change.patch()) else {
                continue;
            };
            if let Some(task) = tasks.iter_mut().find(|task| task.id() == id)
                && let Err(err) = patch.apply_to(task)
            {
                warn!(task = %id, error = %err, "dropping buffered edit that no longer applies");
            }
        }
        self.store.replace(tasks, snapshot.links);
        debug!(version = self.store.version(), "store reloaded from provider");
        Ok(())
    }

    /// Reloads after a failed batch, falling back to `before` when the
    /// provider is unreachable. Returns `true` when the reload succeeded.
    async fn resync_or_restore(&mut self, before: &TaskStore) -> bool {
        match self.reload().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "resync failed, restoring local state");
                self.store
                    .replace(before.tasks().cloned(), before.links().cloned());
                false
            }
        }
    }

    /// Stores provider results, re-applying edits still buffered locally.
    fn accept_canonical(&mut self, tasks: impl IntoIterator<Item = Task>) {
        let ledger = &self.ledger;
        let merged = tasks.into_iter().map(|mut task| {
            if let Some(patch) = ledger.buffered(task.id()).and_then(PendingChange::patch)
                && let Err(err) = patch.apply_to(&mut task)
            {
                warn!(task = %task.id(), error = %err, "buffered edit conflicts with provider state");
            }
            task
        });
        self.store.upsert_tasks(merged);
    }

    /// Rolls back the fields `patch` touches.
    fn revert_fields(
        &mut self,
        id: TaskId,
        patch: &TaskPatch,
        snapshot: &Task,
    ) -> Result<(), TaskDomainError> {
        let Some(mut current) = self.store.task(id).cloned() else {
            return Ok(());
        };
        patch.restore(&mut current, snapshot)?;
        self.store.upsert_task(current);
        Ok(())
    }

    fn buffered_patch(&self, id: TaskId) -> Option<(MutationId, TaskPatch)> {
        self.ledger
            .buffered(id)
            .and_then(|change| change.patch().map(|patch| (change.id(), patch.clone())))
    }

    async fn move_task(
        &mut self,
        id: TaskId,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> SyncResult<CommandOutcome> {
        if !self.preserve_workdays {
            return self.update_task(id, &TaskPatch::schedule(start, end)).await;
        }
        let task = self.store.task(id).ok_or(SyncError::UnknownTask(id))?;
        let correction = correct_move(task, &self.calendar, start, end)?;
        let outcome = self.update_task(id, &correction.patch()).await?;
        Ok(match correction.end.filter(|_| correction.corrected) {
            Some(adjusted) => outcome.with_notification(Notification::info(format!(
                "End date adjusted to {adjusted} to keep the task's workdays"
            ))),
            None => outcome,
        })
    }

    async fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> SyncResult<CommandOutcome> {
        let snapshot = self
            .store
            .task(id)
            .cloned()
            .ok_or(SyncError::UnknownTask(id))?;
        if patch.is_empty() || patch.is_redundant_for(&snapshot) {
            debug!(task = %id, "update changes nothing");
            return Ok(self.unchanged());
        }
        self.store.apply_patch(id, patch)?;
        let mutation = self.ledger.record(
            EntityRef::Task(id),
            ChangeOperation::Update {
                patch: patch.clone(),
                snapshot: snapshot.clone(),
            },
            ChangeScope::Persisted,
            self.now(),
        );
        self.persist_update(id, mutation, patch, &snapshot).await
    }

    async fn persist_update(
        &mut self,
        id: TaskId,
        mutation: MutationId,
        patch: &TaskPatch,
        snapshot: &Task,
    ) -> SyncResult<CommandOutcome> {
        self.ledger
            .transition(mutation, SyncPhase::Persisting, self.now())?;
        match self.provider.sync_task(id, patch).await {
            Ok(canonical) => {
                self.accept_canonical([canonical]);
                self.ledger
                    .transition(mutation, SyncPhase::Confirmed, self.now())?;
                Ok(self
                    .unchanged()
                    .with_affected([id])
                    .with_mutation(mutation)
                    .with_notification(Notification::success("Task updated")))
            }
            Err(source) => {
                warn!(task = %id, error = %source, "task update rejected, reverting");
                self.revert_fields(id, patch, snapshot)?;
                self.ledger
                    .transition(mutation, SyncPhase::Failed, self.now())?;
                Err(SyncError::Persistence {
                    operation: "update task",
                    mutation: Some(mutation),
                    resynced: false,
                    source,
                })
            }
        }
    }

    async fn cascade_move(&mut self, parent: TaskId, diff_days: i64) -> SyncResult<CommandOutcome> {
        if diff_days == 0 {
            return Ok(self.unchanged());
        }
        let plan = plan_cascade(&self.store, &self.calendar, parent, diff_days)?;
        let patches = plan.patches();
        let before = self.store.clone();
        self.store.apply_batch(&patches)?;
        let mutation = self.ledger.record(
            EntityRef::Task(parent),
            ChangeOperation::Cascade {
                moves: patches.clone(),
            },
            ChangeScope::Persisted,
            self.now(),
        );
        self.ledger
            .transition(mutation, SyncPhase::Persisting, self.now())?;

        let mut confirmed = Vec::with_capacity(patches.len());
        for (id, patch) in &patches {
            match self.provider.sync_task(*id, patch).await {
                Ok(canonical) => confirmed.push(canonical),
                Err(source) => {
                    warn!(parent = %parent, task = %id, error = %source,
                        "cascade step rejected, resynchronizing");
                    self.ledger
                        .transition(mutation, SyncPhase::Failed, self.now())?;
                    let resynced = self.resync_or_restore(&before).await;
                    self.ledger
                        .transition(mutation, SyncPhase::Reverted, self.now())?;
                    return Err(SyncError::Persistence {
                        operation: "cascade move",
                        mutation: None,
                        resynced,
                        source,
                    });
                }
            }
        }
        self.accept_canonical(confirmed);
        self.ledger
            .transition(mutation, SyncPhase::Confirmed, self.now())?;
        info!(parent = %parent, moved = plan.len(), "cascade persisted");

        let mut outcome = self
            .unchanged()
            .with_affected(plan.moves.iter().map(|step| step.id))
            .with_mutation(mutation)
            .with_notification(Notification::success(format!(
                "Moved {} tasks",
                plan.len()
            )));
        if !plan.ignored_links.is_empty() {
            outcome = outcome.with_notification(Notification::info(format!(
                "Ignored {} circular links while moving",
                plan.ignored_links.len()
            )));
        }
        Ok(outcome)
    }

    async fn reorder(
        &mut self,
        moved: TaskId,
        target: TaskId,
        position: ReorderPosition,
    ) -> SyncResult<CommandOutcome> {
        let plan = match resolve_reorder(&self.store, moved, target, position)? {
            ReorderResolution::NoOp => return Ok(self.unchanged()),
            ReorderResolution::Move(plan) => plan,
        };
        let patches: Vec<(TaskId, TaskPatch)> = renumber(&self.store, &plan)
            .into_iter()
            .map(|(id, order)| (id, TaskPatch::order(order)))
            .collect();
        let before = self.store.clone();
        self.store.apply_batch(&patches)?;
        let mutation = self.ledger.record(
            EntityRef::Task(moved),
            ChangeOperation::Reorder(plan),
            ChangeScope::Persisted,
            self.now(),
        );
        self.ledger
            .transition(mutation, SyncPhase::Persisting, self.now())?;

        if let Err(source) = self
            .provider
            .reorder_task(plan.moved, plan.anchor, plan.position)
            .await
        {
            warn!(task = %moved, anchor = %plan.anchor, error = %source,
                "reorder rejected, resynchronizing");
            self.ledger
                .transition(mutation, SyncPhase::Failed, self.now())?;
            let resynced = self.resync_or_restore(&before).await;
            self.ledger
                .transition(mutation, SyncPhase::Reverted, self.now())?;
            return Err(SyncError::Persistence {
                operation: "reorder task",
                mutation: None,
                resynced,
                source,
            });
        }
        self.ledger
            .transition(mutation, SyncPhase::Confirmed, self.now())?;
        let outcome = self
            .unchanged()
            .with_affected(patches.iter().map(|(id, _)| *id))
            .with_mutation(mutation)
            .with_notification(Notification::success("Task reordered"));
        Ok(if plan.anchor == target {
            outcome
        } else {
            outcome.with_notification(Notification::info(format!(
                "Placed {} task {}",
                plan.position, plan.anchor
            )))
        })
    }

    async fn create_link(&mut self, proposal: LinkProposal) -> SyncResult<CommandOutcome> {
        let draft = validate_new_link(&proposal, &self.store)?;
        let provisional = self
            .store
            .provisional_link_id()
            .ok_or(TaskDomainError::InvalidLinkId(0))?;
        self.store.upsert_link(draft.into_link(provisional)?);
        let mutation = self.ledger.record(
            EntityRef::Link(provisional),
            ChangeOperation::CreateLink { draft, provisional },
            ChangeScope::Persisted,
            self.now(),
        );
        self.ledger
            .transition(mutation, SyncPhase::Persisting, self.now())?;

        match self.provider.create_link(&draft).await {
            Ok(link) => {
                debug!(provisional = %provisional, link = %link.id(), "link persisted");
                self.store.replace_link(provisional, link);
                self.ledger
                    .transition(mutation, SyncPhase::Confirmed, self.now())?;
                Ok(self
                    .unchanged()
                    .with_affected([draft.source, draft.target])
                    .with_mutation(mutation)
                    .with_notification(Notification::success("Link created")))
            }
            Err(source) => {
                warn!(source_task = %draft.source, target_task = %draft.target, error = %source,
                    "link creation rejected, removing");
                self.store.remove_link(provisional);
                self.ledger
                    .transition(mutation, SyncPhase::Failed, self.now())?;
                Err(SyncError::Persistence {
                    operation: "create link",
                    mutation: Some(mutation),
                    resynced: false,
                    source,
                })
            }
        }
    }

    async fn delete_link(&mut self, link_id: LinkId) -> SyncResult<CommandOutcome> {
        let link = self
            .store
            .link(link_id)
            .cloned()
            .ok_or(SyncError::UnknownLink(link_id))?;
        let (link, deletion, resynced) = match classify_deletion(&link) {
            Ok(deletion) => (link, deletion, false),
            Err(LinkValidationError::IncompleteMetadata(_)) => {
                info!(link = %link_id, "link has no provider record, resynchronizing before delete");
                self.reload()
                    .await
                    .map_err(|source| SyncError::provider("delete link", source))?;
                let refreshed = self
                    .store
                    .links()
                    .find(|candidate| {
                        candidate.source() == link.source()
                            && candidate.target() == link.target()
                            && candidate.kind() == link.kind()
                    })
                    .cloned()
                    .ok_or(SyncError::StaleMetadata(link_id))?;
                let deletion = classify_deletion(&refreshed)
                    .map_err(|_| SyncError::StaleMetadata(link_id))?;
                (refreshed, deletion, true)
            }
            Err(other) => return Err(other.into()),
        };

        self.store.remove_link(link.id());
        let mutation = self.ledger.record(
            EntityRef::Link(link.id()),
            ChangeOperation::DeleteLink(link.clone()),
            ChangeScope::Persisted,
            self.now(),
        );
        self.ledger
            .transition(mutation, SyncPhase::Persisting, self.now())?;
        let request = LinkDeletionRequest {
            link_id: link.id(),
            source_id: link.source(),
            target_id: link.target(),
            deletion,
            options: self.sync_options.clone(),
        };

        match self.provider.delete_link(&request).await {
            Ok(()) => {
                self.ledger
                    .transition(mutation, SyncPhase::Confirmed, self.now())?;
                let outcome = self
                    .unchanged()
                    .with_affected([link.source(), link.target()])
                    .with_mutation(mutation)
                    .with_notification(Notification::success("Link deleted"));
                Ok(if resynced { outcome.resynced() } else { outcome })
            }
            Err(source) => {
                warn!(link = %link.id(), error = %source, "link deletion rejected, restoring");
                self.store.upsert_link(link);
                self.ledger
                    .transition(mutation, SyncPhase::Failed, self.now())?;
                Err(SyncError::Persistence {
                    operation: "delete link",
                    mutation: Some(mutation),
                    resynced,
                    source,
                })
            }
        }
    }

    async fn create_task(&mut self, draft: &TaskDraft) -> SyncResult<CommandOutcome> {
        draft.validate()?;
        if let Some(parent) = draft.parent
            && !self.store.contains(parent)
        {
            return Err(TaskDomainError::UnknownParent(parent).into());
        }
        let task = self
            .provider
            .create_task(draft)
            .await
            .map_err(|source| SyncError::provider("create task", source))?;
        let id = task.id();
        self.store.upsert_task(task);
        info!(task = %id, "task created");
        Ok(self
            .unchanged()
            .with_affected([id])
            .with_notification(Notification::success("Task created")))
    }

    async fn delete_task(&mut self, id: TaskId) -> SyncResult<CommandOutcome> {
        if !self.store.contains(id) {
            return Err(SyncError::UnknownTask(id));
        }
        if !self.store.children(Some(id)).is_empty() {
            return Err(TaskDomainError::HasChildren(id).into());
        }
        if self.editing() == Some(id) {
            self.cancel_editor()?;
        }
        let (task, links) = self
            .store
            .remove_task(id)
            .ok_or(SyncError::UnknownTask(id))?;
        let mutation = self.ledger.record(
            EntityRef::Task(id),
            ChangeOperation::DeleteTask {
                task: task.clone(),
                links: links.clone(),
            },
            ChangeScope::Persisted,
            self.now(),
        );
        self.ledger
            .transition(mutation, SyncPhase::Persisting, self.now())?;

        match self.provider.delete_task(id).await {
            Ok(()) => {
                self.ledger
                    .transition(mutation, SyncPhase::Confirmed, self.now())?;
                Ok(self
                    .unchanged()
                    .with_affected([id])
                    .with_mutation(mutation)
                    .with_notification(Notification::success("Task deleted")))
            }
            Err(source) => {
                warn!(task = %id, error = %source, "task deletion rejected, restoring");
                self.store.restore_task(task, links);
                self.ledger
                    .transition(mutation, SyncPhase::Failed, self.now())?;
                Err(SyncError::Persistence {
                    operation: "delete task",
                    mutation: Some(mutation),
                    resynced: false,
                    source,
                })
            }
        }
    }

    fn open_editor(&mut self, id: TaskId) -> SyncResult<CommandOutcome> {
        let snapshot = self
            .store
            .task(id)
            .cloned()
            .ok_or(SyncError::UnknownTask(id))?;
        match self.editor.as_ref() {
            Some(session) if session.task == id => return Ok(self.unchanged()),
            Some(session) => return Err(SyncError::EditorBusy(session.task)),
            None => {}
        }
        self.editor = Some(EditorSession { task: id, snapshot });
        Ok(self.unchanged())
    }

    async fn edit_fields(&mut self, id: TaskId, patch: TaskPatch) -> SyncResult<CommandOutcome> {
        let Some(session_snapshot) = self
            .editor
            .as_ref()
            .filter(|session| session.task == id)
            .map(|session| session.snapshot.clone())
        else {
            return self.update_task(id, &patch).await;
        };
        let mut preview = self
            .store
            .task(id)
            .cloned()
            .ok_or(SyncError::UnknownTask(id))?;
        patch.apply_to(&mut preview)?;

        let (schedule, details) = patch.split_schedule();
        let mut outcome = self.unchanged();
        if !details.is_empty() {
            self.store.apply_patch(id, &details)?;
            let now = self.now();
            let mutation = self.ledger.buffer(&session_snapshot, details, now);
            debug!(task = %id, mutation = %mutation, "editor change buffered");
            outcome = self.unchanged().with_affected([id]).with_mutation(mutation);
        }
        if schedule.is_empty() {
            return Ok(outcome);
        }
        let persisted = self.update_task(id, &schedule).await?;
        Ok(outcome.absorb(persisted))
    }

    async fn save_editor(&mut self) -> SyncResult<CommandOutcome> {
        let session = self.editor.take().ok_or(SyncError::NoEditorSession)?;
        let Some((mutation, patch)) = self.buffered_patch(session.task) else {
            return Ok(self.unchanged());
        };
        self.persist_update(session.task, mutation, &patch, &session.snapshot)
            .await
    }

    fn cancel_editor(&mut self) -> SyncResult<CommandOutcome> {
        let session = self.editor.take().ok_or(SyncError::NoEditorSession)?;
        let Some((mutation, patch)) = self.buffered_patch(session.task) else {
            return Ok(self.unchanged());
        };
        self.revert_fields(session.task, &patch, &session.snapshot)?;
        self.ledger
            .transition(mutation, SyncPhase::Reverted, self.now())?;
        Ok(self
            .unchanged()
            .with_affected([session.task])
            .with_mutation(mutation))
    }

    async fn refresh(&mut self, options: SyncOptions) -> SyncResult<CommandOutcome> {
        self.sync_options = options;
        self.reload()
            .await
            .map_err(|source| SyncError::provider("refresh", source))?;
        self.ledger.prune_settled();
        Ok(self
            .unchanged()
            .with_affected(self.store.task_ids())
            .resynced())
    }

    async fn retry(&mut self, mutation: MutationId) -> SyncResult<CommandOutcome> {
        let operation = self.ledger.retryable(mutation)?.clone();
        self.ledger
            .transition(mutation, SyncPhase::Reverted, self.now())?;
        info!(mutation = %mutation, operation = operation.label(), "retrying failed change");
        match operation {
            ChangeOperation::Update { patch, snapshot } => {
                self.update_task(snapshot.id(), &patch).await
            }
            ChangeOperation::CreateLink { draft, .. } => {
                let proposal =
                    LinkProposal::new(draft.source.value(), draft.target.value(), draft.kind)
                        .with_lag(draft.lag_days);
                self.create_link(proposal).await
            }
            ChangeOperation::DeleteLink(link) => self.delete_link(link.id()).await,
            ChangeOperation::DeleteTask { task, .. } => self.delete_task(task.id()).await,
            ChangeOperation::Cascade { .. } | ChangeOperation::Reorder(_) => {
                Err(LedgerError::NotRetryable(mutation).into())
            }
        }
    }

    fn discard(&mut self, mutation: MutationId) -> SyncResult<CommandOutcome> {
        self.ledger.failed(mutation)?;
        self.ledger
            .transition(mutation, SyncPhase::Reverted, self.now())?;
        Ok(self.unchanged().with_mutation(mutation))
    }
}
