//! Task aggregate and creation payloads.

use super::{ProviderSource, TaskDomainError, TaskId, TaskKind};
use crate::calendar::WorkCalendar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A schedulable row in the task graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    kind: TaskKind,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    start: Option<NaiveDate>,
    #[serde(default)]
    end: Option<NaiveDate>,
    #[serde(default)]
    duration: Option<i64>,
    #[serde(default)]
    parent: Option<TaskId>,
    #[serde(default)]
    display_order: Option<i64>,
    #[serde(default)]
    source: Option<ProviderSource>,
}

impl Task {
    /// Creates an unscheduled root task.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            description: None,
            labels: Vec::new(),
            start: None,
            end: None,
            duration: None,
            parent: None,
            display_order: None,
            source: None,
        }
    }

    /// Sets the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EndBeforeStart`] when both dates are present
    /// and `end < start`.
    pub fn with_schedule(
        mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, TaskDomainError> {
        self.reschedule(start, end)?;
        Ok(self)
    }

    /// Sets the parent task.
    #[must_use]
    pub const fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.set_labels(labels);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description(Some(description.into()));
        self
    }

    /// Sets the explicit sibling ordering key.
    #[must_use]
    pub const fn with_display_order(mut self, display_order: i64) -> Self {
        self.display_order = Some(display_order);
        self
    }

    /// Sets an explicit workday duration for open-ended tasks.
    #[must_use]
    pub const fn with_duration(mut self, workdays: i64) -> Self {
        self.duration = Some(workdays);
        self
    }

    /// Attaches the provider-origin record.
    #[must_use]
    pub fn with_source(mut self, source: ProviderSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the subtype.
    #[must_use]
    pub const fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the start date.
    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Returns the end date.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Returns the parent task, `None` for root tasks.
    #[must_use]
    pub const fn parent(&self) -> Option<TaskId> {
        self.parent
    }

    /// Returns the explicit sibling ordering key.
    #[must_use]
    pub const fn display_order(&self) -> Option<i64> {
        self.display_order
    }

    /// Returns the provider-origin record.
    #[must_use]
    pub const fn source(&self) -> Option<&ProviderSource> {
        self.source.as_ref()
    }

    /// Returns the duration in workdays.
    ///
    /// Derived from the schedule when both dates are present, otherwise the
    /// explicit duration (or zero).
    #[must_use]
    pub fn workdays(&self, calendar: &WorkCalendar) -> i64 {
        if self.start.is_some() && self.end.is_some() {
            return calendar.count_workdays(self.start, self.end);
        }
        self.duration.unwrap_or_default()
    }

    /// Replaces the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EndBeforeStart`] when `end < start`; the
    /// task is left unchanged.
    pub fn reschedule(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(), TaskDomainError> {
        if let (Some(first), Some(last)) = (start, end)
            && last < first
        {
            return Err(TaskDomainError::EndBeforeStart {
                id: self.id,
                start: first,
                end: last,
            });
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn rename(&mut self, title: &str) -> Result<(), TaskDomainError> {
        let normalized = title.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        normalized.clone_into(&mut self.title);
        Ok(())
    }

    /// Replaces the labels, dropping blank entries.
    pub fn set_labels(&mut self, labels: impl IntoIterator<Item = String>) {
        self.labels = labels
            .into_iter()
            .map(|label| label.trim().to_owned())
            .filter(|label| !label.is_empty())
            .collect();
    }

    /// Replaces the description; blank text clears it.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
    }

    /// Replaces the sibling ordering key.
    pub const fn set_display_order(&mut self, display_order: Option<i64>) {
        self.display_order = display_order;
    }
}

/// Payload for creating a task through the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Title of the new task.
    pub title: String,
    /// Subtype of the new task.
    pub kind: TaskKind,
    /// Parent task, `None` for a root task.
    #[serde(default)]
    pub parent: Option<TaskId>,
    /// Start date.
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// End date.
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// Labels.
    #[serde(default)]
    pub labels: Vec<String>,
}

impl TaskDraft {
    /// Creates a draft with required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            title: title.into(),
            kind,
            parent: None,
            start: None,
            end: None,
            labels: Vec::new(),
        }
    }

    /// Sets the parent task.
    #[must_use]
    pub const fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the schedule.
    #[must_use]
    pub const fn with_schedule(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Sets the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Checks the draft before it is sent to a provider.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title and
    /// [`TaskDomainError::DraftEndBeforeStart`] for an inverted schedule.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        if self.title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        if let (Some(start), Some(end)) = (self.start, self.end)
            && end < start
        {
            return Err(TaskDomainError::DraftEndBeforeStart { start, end });
        }
        Ok(())
    }
}
