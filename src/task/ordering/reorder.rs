//! Anchor resolution for drag-to-reorder.

use super::ReorderError;
use crate::task::domain::{OrderClass, Task, TaskId, TaskStore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the anchor the moved task lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderPosition {
    /// Directly before the anchor.
    Before,
    /// Directly after the anchor.
    After,
}

impl ReorderPosition {
    /// Returns the provider wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for ReorderPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reorder the provider can execute: both tasks share an ordering class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPlan {
    /// Task being moved.
    pub moved: TaskId,
    /// Sibling the move is expressed relative to.
    pub anchor: TaskId,
    /// Side of the anchor.
    pub position: ReorderPosition,
}

/// Outcome of [`resolve_reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderResolution {
    /// Nothing to do, for example a lone task dropped on itself.
    NoOp,
    /// Execute the plan.
    Move(ReorderPlan),
}

/// Returns the siblings sharing `parent`, ordered by explicit display order
/// (tasks with one first, ascending) and then by the decimal id text.
#[must_use]
pub fn ordered_siblings(store: &TaskStore, parent: Option<TaskId>) -> Vec<&Task> {
    let mut siblings = store.children(parent);
    siblings.sort_by_cached_key(|task| {
        (
            task.display_order().is_none(),
            task.display_order(),
            task.id().to_string(),
        )
    });
    siblings
}

fn class_of(task: &Task) -> OrderClass {
    task.kind().order_class()
}

const fn is_restricted(class: OrderClass) -> bool {
    matches!(class, OrderClass::Milestone | OrderClass::Summary)
}

/// Resolves a drop of `moved` onto `target` into a provider-safe plan.
///
/// Dropping a task on itself means "move to the top": the request is
/// reissued as "before the first other sibling". When the kinds are
/// incompatible the move is re-anchored on the nearest sibling of the moved
/// task's class.
///
/// # Errors
///
/// Returns [`ReorderError::UnknownTask`], [`ReorderError::NotSiblings`],
/// or [`ReorderError::NoCompatibleAnchor`] when no sibling of a compatible
/// class exists on the relevant side.
pub fn resolve_reorder(
    store: &TaskStore,
    moved: TaskId,
    target: TaskId,
    position: ReorderPosition,
) -> Result<ReorderResolution, ReorderError> {
    let moved_task = store.task(moved).ok_or(ReorderError::UnknownTask(moved))?;
    let target_task = store
        .task(target)
        .ok_or(ReorderError::UnknownTask(target))?;
    if moved_task.parent() != target_task.parent() {
        return Err(ReorderError::NotSiblings { moved, target });
    }

    let siblings = ordered_siblings(store, moved_task.parent());
    if moved == target {
        let Some(first) = siblings.iter().find(|task| task.id() != moved) else {
            return Ok(ReorderResolution::NoOp);
        };
        return resolve_reorder(store, moved, first.id(), ReorderPosition::Before);
    }

    let moved_class = class_of(moved_task);
    let target_class = class_of(target_task);
    if moved_class == target_class {
        return Ok(ReorderResolution::Move(ReorderPlan {
            moved,
            anchor: target,
            position,
        }));
    }

    let no_anchor = ReorderError::NoCompatibleAnchor {
        moved,
        target,
        position,
    };
    let target_index = siblings
        .iter()
        .position(|task| task.id() == target)
        .ok_or(ReorderError::UnknownTask(target))?;
    let compatible = |task: &&&Task| task.id() != moved && class_of(task) == moved_class;
    let successor = siblings.iter().skip(target_index + 1).find(compatible);

    if is_restricted(target_class) {
        let anchor = successor.ok_or(no_anchor)?;
        return Ok(ReorderResolution::Move(ReorderPlan {
            moved,
            anchor: anchor.id(),
            position: ReorderPosition::Before,
        }));
    }

    let predecessor = siblings.iter().take(target_index).rev().find(compatible);
    let (anchor, anchored_position) = match (position, predecessor, successor) {
        (ReorderPosition::Before, Some(pred), _) => (pred, ReorderPosition::After),
        (_, _, Some(succ)) => (succ, ReorderPosition::Before),
        (_, Some(pred), None) => (pred, ReorderPosition::After),
        (_, None, None) => return Err(no_anchor),
    };
    Ok(ReorderResolution::Move(ReorderPlan {
        moved,
        anchor: anchor.id(),
        position: anchored_position,
    }))
}

/// Computes consecutive display orders (starting at 1) for the siblings of
/// `plan.moved` after applying the plan locally.
///
/// Returns only the entries whose display order changes.
#[must_use]
pub fn renumber(store: &TaskStore, plan: &ReorderPlan) -> Vec<(TaskId, i64)> {
    let Some(parent) = store.task(plan.moved).map(Task::parent) else {
        return Vec::new();
    };
    let siblings = ordered_siblings(store, parent);
    let mut sequence: Vec<TaskId> = siblings
        .iter()
        .map(|task| task.id())
        .filter(|id| *id != plan.moved)
        .collect();
    let Some(anchor_index) = sequence.iter().position(|id| *id == plan.anchor) else {
        return Vec::new();
    };
    let insert_at = match plan.position {
        ReorderPosition::Before => anchor_index,
        ReorderPosition::After => anchor_index + 1,
    };
    sequence.insert(insert_at, plan.moved);

    sequence
        .into_iter()
        .zip(1_i64..)
        .filter(|(id, order)| {
            store
                .task(*id)
                .is_some_and(|task| task.display_order() != Some(*order))
        })
        .collect()
}
