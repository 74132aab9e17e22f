//! Versioned in-memory task and link arena.

use super::{Link, LinkId, Task, TaskDomainError, TaskId, TaskPatch};
use std::collections::{BTreeMap, BTreeSet};

/// Owned snapshot of the task graph.
///
/// Every successful mutation bumps [`Self::version`] exactly once, so batch
/// operations such as a cascade appear to readers as a single change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: BTreeMap<TaskId, Task>,
    links: BTreeMap<LinkId, Link>,
    version: u64,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from provider data; later duplicates replace earlier
    /// ones.
    #[must_use]
    pub fn from_parts(
        tasks: impl IntoIterator<Item = Task>,
        links: impl IntoIterator<Item = Link>,
    ) -> Self {
        let mut store = Self::new();
        store.load(tasks, links);
        store
    }

    /// Returns the mutation counter.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up a task.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Returns `true` when the task exists.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Iterates tasks in id order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Returns the set of known task ids.
    #[must_use]
    pub fn task_ids(&self) -> BTreeSet<TaskId> {
        self.tasks.keys().copied().collect()
    }

    /// Looks up a link.
    #[must_use]
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    /// Iterates links in id order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Returns the direct children of `parent` (`None` for root tasks).
    #[must_use]
    pub fn children(&self, parent: Option<TaskId>) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|task| task.parent() == parent)
            .collect()
    }

    /// Returns all descendants of `id` (children, grandchildren, ...) in
    /// discovery order.
    ///
    /// Each task is visited at most once, so malformed parent data cannot
    /// loop.
    #[must_use]
    pub fn descendants(&self, id: TaskId) -> Vec<TaskId> {
        let mut visited = BTreeSet::from([id]);
        let mut ordered = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for child in self.children(Some(current)).into_iter().rev() {
                if visited.insert(child.id()) {
                    ordered.push(child.id());
                    stack.push(child.id());
                }
            }
        }
        ordered
    }

    /// Returns an unused link id for a link that has not been persisted yet.
    ///
    /// Provisional ids are allocated downwards from `u64::MAX` so they never
    /// collide with provider-assigned ids.
    #[must_use]
    pub fn provisional_link_id(&self) -> Option<LinkId> {
        (1..=u64::MAX)
            .rev()
            .filter_map(|value| LinkId::new(value).ok())
            .find(|candidate| !self.links.contains_key(candidate))
    }

    /// Inserts or replaces a task.
    pub fn upsert_task(&mut self, task: Task) {
        self.tasks.insert(task.id(), task);
        self.bump();
    }

    /// Inserts or replaces several tasks with one version bump.
    pub fn upsert_tasks(&mut self, tasks: impl IntoIterator<Item = Task>) {
        let mut touched = false;
        for task in tasks {
            self.tasks.insert(task.id(), task);
            touched = true;
        }
        if touched {
            self.bump();
        }
    }

    /// Puts back a removed task together with its links.
    pub fn restore_task(&mut self, task: Task, links: impl IntoIterator<Item = Link>) {
        self.tasks.insert(task.id(), task);
        self.links
            .extend(links.into_iter().map(|link| (link.id(), link)));
        self.bump();
    }

    /// Removes a task and every link touching it.
    pub fn remove_task(&mut self, id: TaskId) -> Option<(Task, Vec<Link>)> {
        let task = self.tasks.remove(&id)?;
        let touching: Vec<LinkId> = self
            .links
            .values()
            .filter(|link| link.source() == id || link.target() == id)
            .map(Link::id)
            .collect();
        let removed = touching
            .into_iter()
            .filter_map(|link_id| self.links.remove(&link_id))
            .collect();
        self.bump();
        Some((task, removed))
    }

    /// Inserts or replaces a link.
    pub fn upsert_link(&mut self, link: Link) {
        self.links.insert(link.id(), link);
        self.bump();
    }

    /// Swaps a provisional link for its persisted version.
    pub fn replace_link(&mut self, provisional: LinkId, link: Link) {
        self.links.remove(&provisional);
        self.links.insert(link.id(), link);
        self.bump();
    }

    /// Removes a link.
    pub fn remove_link(&mut self, id: LinkId) -> Option<Link> {
        let link = self.links.remove(&id)?;
        self.bump();
        Some(link)
    }

    /// Applies a patch to one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the patch is rejected; the store is
    /// unchanged.
    pub fn apply_patch(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), TaskDomainError> {
        self.apply_batch(&[(id, patch.clone())])
    }

    /// Applies several patches atomically: either all are applied with one
    /// version bump, or none is. Unknown task ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first [`TaskDomainError`] raised by a patch.
    pub fn apply_batch(&mut self, patches: &[(TaskId, TaskPatch)]) -> Result<(), TaskDomainError> {
        let mut staged: BTreeMap<TaskId, Task> = BTreeMap::new();
        for (id, patch) in patches {
            let Some(current) = staged.get(id).or_else(|| self.tasks.get(id)) else {
                continue;
            };
            let mut updated = current.clone();
            patch.apply_to(&mut updated)?;
            staged.insert(*id, updated);
        }
        if staged.is_empty() {
            return Ok(());
        }
        self.tasks.extend(staged);
        self.bump();
        Ok(())
    }

    /// Replaces the entire contents with provider data.
    pub fn replace(
        &mut self,
        tasks: impl IntoIterator<Item = Task>,
        links: impl IntoIterator<Item = Link>,
    ) {
        self.load(tasks, links);
        self.bump();
    }

    fn load(&mut self, tasks: impl IntoIterator<Item = Task>, links: impl IntoIterator<Item = Link>) {
        self.tasks = tasks.into_iter().map(|task| (task.id(), task)).collect();
        self.links = links.into_iter().map(|link| (link.id(), link)).collect();
    }

    const fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
