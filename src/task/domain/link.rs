//! Dependency links between tasks.

use super::{LinkId, ParseTaskEnumError, TaskDomainError, TaskId};
use serde::{Deserialize, Serialize};

/// Scheduling relation between a link's source and target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Target starts when the source starts.
    StartToStart,
    /// Target starts after the source ends.
    #[default]
    EndToStart,
    /// Target ends when the source ends.
    EndToEnd,
    /// Target ends when the source starts.
    StartToEnd,
}

impl LinkKind {
    /// Returns the canonical storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartToStart => "start_to_start",
            Self::EndToStart => "end_to_start",
            Self::EndToEnd => "end_to_end",
            Self::StartToEnd => "start_to_end",
        }
    }

    /// Returns the numeric code used by Gantt link payloads.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::EndToStart => 0,
            Self::StartToStart => 1,
            Self::EndToEnd => 2,
            Self::StartToEnd => 3,
        }
    }
}

impl TryFrom<&str> for LinkKind {
    type Error = ParseTaskEnumError;

    /// Accepts storage names, short forms (`e2s`, `fs`) and Gantt numeric
    /// codes (`0`..`3`).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "start_to_start" | "s2s" | "ss" | "1" => Ok(Self::StartToStart),
            "end_to_start" | "e2s" | "fs" | "0" => Ok(Self::EndToStart),
            "end_to_end" | "e2e" | "ff" | "2" => Ok(Self::EndToEnd),
            "start_to_end" | "s2e" | "sf" | "3" => Ok(Self::StartToEnd),
            _ => Err(ParseTaskEnumError::new("link kind", value)),
        }
    }
}

/// Relation name used by description-embedded link metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataRelation {
    /// The source blocks the target.
    Blocks,
    /// The source is blocked by the target.
    BlockedBy,
}

impl MetadataRelation {
    /// Returns the canonical storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::BlockedBy => "blocked_by",
        }
    }
}

/// How a link is represented by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkProvenance {
    /// A first-class remote link object.
    Native,
    /// Relation metadata embedded in the task description.
    Metadata,
}

/// Provider-side record of a link, filled in after its first round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Representation used by the provider.
    pub provenance: LinkProvenance,
    /// Remote identifier of the linked target, for native links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_target: Option<String>,
    /// Relation name, for metadata links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<MetadataRelation>,
    /// Project-local number of the target, for metadata links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_iid: Option<u64>,
}

impl LinkRecord {
    /// Creates a native link record.
    #[must_use]
    pub fn native(remote_target: impl Into<String>) -> Self {
        Self {
            provenance: LinkProvenance::Native,
            remote_target: Some(remote_target.into()),
            relation: None,
            target_iid: None,
        }
    }

    /// Creates a metadata link record.
    #[must_use]
    pub const fn metadata(relation: MetadataRelation, target_iid: u64) -> Self {
        Self {
            provenance: LinkProvenance::Metadata,
            remote_target: None,
            relation: Some(relation),
            target_iid: Some(target_iid),
        }
    }
}

/// A dependency edge in the task graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    id: LinkId,
    source: TaskId,
    target: TaskId,
    #[serde(default)]
    kind: LinkKind,
    #[serde(default)]
    lag_days: i32,
    #[serde(default)]
    record: Option<LinkRecord>,
}

impl Link {
    /// Creates a link without provider record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SelfLink`] when source and target match.
    pub fn new(
        id: LinkId,
        source: TaskId,
        target: TaskId,
        kind: LinkKind,
    ) -> Result<Self, TaskDomainError> {
        if source == target {
            return Err(TaskDomainError::SelfLink(source));
        }
        Ok(Self {
            id,
            source,
            target,
            kind,
            lag_days: 0,
            record: None,
        })
    }

    /// Sets the signed lag in days.
    #[must_use]
    pub const fn with_lag(mut self, lag_days: i32) -> Self {
        self.lag_days = lag_days;
        self
    }

    /// Attaches the provider record.
    #[must_use]
    pub fn with_record(mut self, record: LinkRecord) -> Self {
        self.record = Some(record);
        self
    }

    /// Returns the link identifier.
    #[must_use]
    pub const fn id(&self) -> LinkId {
        self.id
    }

    /// Returns the predecessor task.
    #[must_use]
    pub const fn source(&self) -> TaskId {
        self.source
    }

    /// Returns the successor task.
    #[must_use]
    pub const fn target(&self) -> TaskId {
        self.target
    }

    /// Returns the relation kind.
    #[must_use]
    pub const fn kind(&self) -> LinkKind {
        self.kind
    }

    /// Returns the lag in days.
    #[must_use]
    pub const fn lag_days(&self) -> i32 {
        self.lag_days
    }

    /// Returns the provider record, absent before the first round-trip.
    #[must_use]
    pub const fn record(&self) -> Option<&LinkRecord> {
        self.record.as_ref()
    }

    /// Returns `true` when this link joins the same tasks with the same kind.
    #[must_use]
    pub fn same_edge(&self, other: &LinkDraft) -> bool {
        self.source == other.source && self.target == other.target && self.kind == other.kind
    }
}

/// A validated link that has not been persisted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkDraft {
    /// Predecessor task.
    pub source: TaskId,
    /// Successor task.
    pub target: TaskId,
    /// Relation kind.
    pub kind: LinkKind,
    /// Signed lag in days.
    pub lag_days: i32,
}

impl LinkDraft {
    /// Materializes the draft under a given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SelfLink`] when source and target match.
    pub fn into_link(self, id: LinkId) -> Result<Link, TaskDomainError> {
        Ok(Link::new(id, self.source, self.target, self.kind)?.with_lag(self.lag_days))
    }
}
