//! Endpoint validation for proposed links.

use super::{LinkValidationError, filter_cycles};
use crate::task::domain::{LinkDraft, LinkKind, TaskId, TaskStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A link as requested by the UI, with raw ids where `0` means "missing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkProposal {
    /// Raw predecessor id.
    pub source: u64,
    /// Raw successor id.
    pub target: u64,
    /// Requested relation kind.
    #[serde(default)]
    pub kind: LinkKind,
    /// Requested lag in days.
    #[serde(default)]
    pub lag_days: i32,
}

impl LinkProposal {
    /// Creates a proposal without lag.
    #[must_use]
    pub const fn new(source: u64, target: u64, kind: LinkKind) -> Self {
        Self {
            source,
            target,
            kind,
            lag_days: 0,
        }
    }

    /// Sets the lag in days.
    #[must_use]
    pub const fn with_lag(mut self, lag_days: i32) -> Self {
        self.lag_days = lag_days;
        self
    }
}

/// Validates endpoints of a proposed link against the known task ids.
///
/// # Errors
///
/// Returns [`LinkValidationError::MissingEndpoint`] when either id is zero,
/// [`LinkValidationError::InvalidEndpoint`] when an id is unknown, and
/// [`LinkValidationError::SelfLink`] when both ids match.
pub fn validate_link(
    proposal: &LinkProposal,
    known_ids: &BTreeSet<TaskId>,
) -> Result<LinkDraft, LinkValidationError> {
    let (Some(source), Some(target)) = (
        TaskId::optional(proposal.source),
        TaskId::optional(proposal.target),
    ) else {
        return Err(LinkValidationError::MissingEndpoint);
    };
    for endpoint in [source, target] {
        if !known_ids.contains(&endpoint) {
            return Err(LinkValidationError::InvalidEndpoint(endpoint.value()));
        }
    }
    if source == target {
        return Err(LinkValidationError::SelfLink(source));
    }
    Ok(LinkDraft {
        source,
        target,
        kind: proposal.kind,
        lag_days: proposal.lag_days,
    })
}

/// Rejects endpoints whose subtype cannot carry provider links.
///
/// # Errors
///
/// Returns [`LinkValidationError::UnsupportedEndpoint`] for milestone and
/// summary endpoints, or [`LinkValidationError::InvalidEndpoint`] when an
/// endpoint vanished from the store.
pub fn validate_endpoint_kinds(
    draft: &LinkDraft,
    store: &TaskStore,
) -> Result<(), LinkValidationError> {
    for endpoint in [draft.source, draft.target] {
        let task = store
            .task(endpoint)
            .ok_or(LinkValidationError::InvalidEndpoint(endpoint.value()))?;
        if !task.kind().is_linkable() {
            return Err(LinkValidationError::UnsupportedEndpoint {
                id: endpoint,
                kind: task.kind().as_str(),
            });
        }
    }
    Ok(())
}

/// Runs every check required before a new link is added to `store`.
///
/// # Errors
///
/// Returns the first [`LinkValidationError`] found: endpoint problems,
/// duplicates of an existing link, or a dependency cycle.
pub fn validate_new_link(
    proposal: &LinkProposal,
    store: &TaskStore,
) -> Result<LinkDraft, LinkValidationError> {
    let draft = validate_link(proposal, &store.task_ids())?;
    validate_endpoint_kinds(&draft, store)?;
    if store.links().any(|link| link.same_edge(&draft)) {
        return Err(LinkValidationError::Duplicate {
            source_id: draft.source,
            target_id: draft.target,
        });
    }

    let mut edges: Vec<(TaskId, TaskId)> = store
        .links()
        .map(|link| (link.source(), link.target()))
        .collect();
    edges.push((draft.source, draft.target));
    let report = filter_cycles(&edges);
    // The proposal is checked last, so it is the final rejection if any.
    if report.rejected.last() == Some(&(draft.source, draft.target)) {
        return Err(LinkValidationError::Cycle {
            source_id: draft.source,
            target_id: draft.target,
        });
    }
    Ok(draft)
}
