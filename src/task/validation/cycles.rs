//! Cycle filtering over directed link sets.

use crate::task::domain::{Link, LinkDraft, TaskId};
use std::collections::{BTreeMap, BTreeSet};

/// Anything with a source and target task.
pub trait DirectedEdge {
    /// Returns `(source, target)`.
    fn endpoints(&self) -> (TaskId, TaskId);
}

impl DirectedEdge for (TaskId, TaskId) {
    fn endpoints(&self) -> (TaskId, TaskId) {
        *self
    }
}

impl DirectedEdge for Link {
    fn endpoints(&self) -> (TaskId, TaskId) {
        (self.source(), self.target())
    }
}

impl DirectedEdge for LinkDraft {
    fn endpoints(&self) -> (TaskId, TaskId) {
        (self.source, self.target)
    }
}

/// Result of [`filter_cycles`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport<T> {
    /// Edges that keep the graph acyclic, in input order.
    pub accepted: Vec<T>,
    /// Edges that would close a cycle, in input order.
    pub rejected: Vec<T>,
    /// Every task reached while searching for cycles.
    pub visited: BTreeSet<TaskId>,
}

impl<T> CycleReport<T> {
    /// Returns `true` when no edge was rejected.
    #[must_use]
    pub const fn is_acyclic(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Splits `edges` into an acyclic accepted set and the edges that would
/// close a cycle.
///
/// Edges are considered in input order. An edge is rejected when its target
/// already reaches its source through previously accepted edges, so a
/// three-task loop loses only its closing edge. Self-loops are always
/// rejected. Each reachability search visits a task at most once, bounding
/// the whole pass to `O(E * (V + E))`.
#[must_use]
pub fn filter_cycles<T: DirectedEdge + Clone>(edges: &[T]) -> CycleReport<T> {
    let mut adjacency: BTreeMap<TaskId, Vec<TaskId>> = BTreeMap::new();
    let mut report = CycleReport {
        accepted: Vec::new(),
        rejected: Vec::new(),
        visited: BTreeSet::new(),
    };

    for edge in edges {
        let (source, target) = edge.endpoints();
        let closes_cycle =
            source == target || reaches(&adjacency, target, source, &mut report.visited);
        if closes_cycle {
            report.rejected.push(edge.clone());
        } else {
            adjacency.entry(source).or_default().push(target);
            report.accepted.push(edge.clone());
        }
    }
    report
}

fn reaches(
    adjacency: &BTreeMap<TaskId, Vec<TaskId>>,
    from: TaskId,
    to: TaskId,
    visited: &mut BTreeSet<TaskId>,
) -> bool {
    let mut seen = BTreeSet::from([from]);
    let mut stack = vec![from];
    while let Some(current) = stack.pop() {
        visited.insert(current);
        if current == to {
            return true;
        }
        for next in adjacency.get(&current).into_iter().flatten() {
            if seen.insert(*next) {
                stack.push(*next);
            }
        }
    }
    false
}
