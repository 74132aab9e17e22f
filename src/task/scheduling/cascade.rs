//! Cascade moves of a parent and its descendants.

use super::{
    CascadeError,
    reschedule::{preserved_end, shift_days},
};
use crate::{
    calendar::WorkCalendar,
    task::{
        domain::{Link, LinkId, LinkKind, Task, TaskId, TaskPatch, TaskStore},
        validation::filter_cycles,
    },
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// New position of one task in a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMove {
    /// Moved task.
    pub id: TaskId,
    /// New start date.
    pub start: NaiveDate,
    /// New end date; `None` for open-ended tasks.
    pub end: Option<NaiveDate>,
}

impl TaskMove {
    /// Returns the schedule patch for this move.
    #[must_use]
    pub const fn patch(&self) -> TaskPatch {
        TaskPatch::schedule(self.start, self.end)
    }
}

/// Ordered set of moves produced by [`plan_cascade`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadePlan {
    /// Moves in processing order: the parent first, then descendants by
    /// ascending offset from the parent's original start.
    pub moves: Vec<TaskMove>,
    /// Links inside the cascade that were ignored because they close a cycle.
    pub ignored_links: Vec<LinkId>,
}

impl CascadePlan {
    /// Returns the number of moved tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns `true` when nothing moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns the moves as store patches, in processing order.
    #[must_use]
    pub fn patches(&self) -> Vec<(TaskId, TaskPatch)> {
        self.moves.iter().map(|step| (step.id, step.patch())).collect()
    }
}

type Span = (NaiveDate, Option<NaiveDate>);

/// Plans shifting `parent_id` by `diff_days` together with its descendants.
///
/// The parent keeps its workday count. Each descendant either follows an
/// inbound link from a task already placed in this cascade (end-to-start:
/// the day after the source's new end; any other kind: the source's new
/// start; lag added in both cases, latest candidate wins) or keeps its
/// original offset from the parent's start. Descendants keep their own
/// workday counts. Descendants without a start date stay where they are.
///
/// # Errors
///
/// Returns [`CascadeError::UnknownTask`] or [`CascadeError::MissingStart`]
/// for the parent, and date arithmetic failures for any task.
pub fn plan_cascade(
    store: &TaskStore,
    calendar: &WorkCalendar,
    parent_id: TaskId,
    diff_days: i64,
) -> Result<CascadePlan, CascadeError> {
    let parent = store
        .task(parent_id)
        .ok_or(CascadeError::UnknownTask(parent_id))?;
    let parent_start = parent
        .start()
        .ok_or(CascadeError::MissingStart(parent_id))?;
    let parent_new_start =
        shift_days(parent_start, diff_days).ok_or(CascadeError::DateOutOfRange(parent_id))?;
    let parent_new_end = preserved_end(parent, calendar, parent_new_start)?;

    let mut descendants: Vec<(i64, &Task)> = store
        .descendants(parent_id)
        .into_iter()
        .filter_map(|id| store.task(id))
        .filter_map(|task| {
            task.start()
                .map(|start| ((start - parent_start).num_days(), task))
        })
        .collect();
    descendants.sort_by_key(|(offset, task)| (*offset, task.id()));

    let participants: BTreeSet<TaskId> = descendants
        .iter()
        .map(|(_, task)| task.id())
        .chain([parent_id])
        .collect();
    let (inbound, ignored_links) = cascade_links(store, &participants);

    let mut placed: BTreeMap<TaskId, Span> = BTreeMap::new();
    placed.insert(parent_id, (parent_new_start, parent_new_end));
    let mut plan = CascadePlan {
        moves: vec![TaskMove {
            id: parent_id,
            start: parent_new_start,
            end: parent_new_end,
        }],
        ignored_links,
    };

    for (offset, task) in descendants {
        let linked_start = inbound
            .get(&task.id())
            .into_iter()
            .flatten()
            .filter_map(|link| {
                placed
                    .get(&link.source())
                    .map(|span| linked_start(link, *span))
            })
            .collect::<Option<Vec<NaiveDate>>>()
            .ok_or(CascadeError::DateOutOfRange(task.id()))?
            .into_iter()
            .max();
        let new_start = match linked_start {
            Some(start) => start,
            None => shift_days(parent_new_start, offset)
                .ok_or(CascadeError::DateOutOfRange(task.id()))?,
        };
        let new_end = preserved_end(task, calendar, new_start)?;
        placed.insert(task.id(), (new_start, new_end));
        plan.moves.push(TaskMove {
            id: task.id(),
            start: new_start,
            end: new_end,
        });
    }
    Ok(plan)
}

/// Collects acyclic inbound links among the cascade participants.
fn cascade_links<'a>(
    store: &'a TaskStore,
    participants: &BTreeSet<TaskId>,
) -> (BTreeMap<TaskId, Vec<&'a Link>>, Vec<LinkId>) {
    let internal: Vec<&Link> = store
        .links()
        .filter(|link| participants.contains(&link.source()) && participants.contains(&link.target()))
        .collect();
    let edges: Vec<(TaskId, TaskId)> = internal
        .iter()
        .map(|link| (link.source(), link.target()))
        .collect();
    let report = filter_cycles(&edges);

    let mut inbound: BTreeMap<TaskId, Vec<&Link>> = BTreeMap::new();
    let mut ignored = Vec::new();
    let mut rejected = report.rejected.into_iter().peekable();
    for link in internal {
        if rejected.peek() == Some(&(link.source(), link.target())) {
            rejected.next();
            warn!(link = %link.id(), source = %link.source(), target = %link.target(),
                "ignoring cyclic link during cascade");
            ignored.push(link.id());
        } else {
            inbound.entry(link.target()).or_default().push(link);
        }
    }
    (inbound, ignored)
}

/// Start date a link imposes on its target given the source's new span.
fn linked_start(link: &Link, (source_start, source_end): Span) -> Option<NaiveDate> {
    let base = match link.kind() {
        LinkKind::EndToStart => source_end.unwrap_or(source_start).succ_opt()?,
        LinkKind::StartToStart | LinkKind::EndToEnd | LinkKind::StartToEnd => source_start,
    };
    shift_days(base, i64::from(link.lag_days()))
}
