//! Task subtypes and the ordering classes derived from them.

use serde::{Deserialize, Serialize};

/// Task subtype with the fields each subtype carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    /// A provider issue.
    Issue {
        /// Project-local issue number used by description-embedded links.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iid: Option<u64>,
    },
    /// A provider work item nested under an issue.
    Task {
        /// Project-local work item number.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iid: Option<u64>,
    },
    /// A provider milestone rendered as a timeline marker.
    Milestone {
        /// Provider milestone identifier.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        milestone_id: Option<u64>,
    },
    /// A local grouping row with no provider counterpart.
    Summary,
}

/// Sibling classes that the provider can reorder relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderClass {
    /// Issues and work items share one relative-position space.
    WorkItem,
    /// Milestones are ordered among themselves only.
    Milestone,
    /// Summary rows are only ordered locally.
    Summary,
}

impl TaskKind {
    /// Creates an issue kind without a local number.
    #[must_use]
    pub const fn issue() -> Self {
        Self::Issue { iid: None }
    }

    /// Creates a work item kind without a local number.
    #[must_use]
    pub const fn work_item() -> Self {
        Self::Task { iid: None }
    }

    /// Creates a milestone kind without a provider identifier.
    #[must_use]
    pub const fn milestone() -> Self {
        Self::Milestone { milestone_id: None }
    }

    /// Returns the canonical storage name of the subtype.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Issue { .. } => "issue",
            Self::Task { .. } => "task",
            Self::Milestone { .. } => "milestone",
            Self::Summary => "summary",
        }
    }

    /// Returns the project-local number for issue-like kinds.
    #[must_use]
    pub const fn local_number(&self) -> Option<u64> {
        match self {
            Self::Issue { iid } | Self::Task { iid } => *iid,
            Self::Milestone { .. } | Self::Summary => None,
        }
    }

    /// Returns the ordering class used by the reorder resolver.
    #[must_use]
    pub const fn order_class(&self) -> OrderClass {
        match self {
            Self::Issue { .. } | Self::Task { .. } => OrderClass::WorkItem,
            Self::Milestone { .. } => OrderClass::Milestone,
            Self::Summary => OrderClass::Summary,
        }
    }

    /// Returns `true` when the subtype may be a dependency link endpoint.
    #[must_use]
    pub const fn is_linkable(&self) -> bool {
        matches!(self, Self::Issue { .. } | Self::Task { .. })
    }
}
