//! Partial task updates exchanged with providers.

use super::{Task, TaskDomainError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A partial task update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description; blank text clears it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New label set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// New start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    /// New end date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// New sibling ordering key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
}

impl TaskPatch {
    /// Creates a patch that sets both schedule dates.
    #[must_use]
    pub const fn schedule(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            title: None,
            description: None,
            labels: None,
            start: Some(start),
            end,
            display_order: None,
        }
    }

    /// Creates a patch that only moves the task among its siblings.
    #[must_use]
    pub const fn order(display_order: i64) -> Self {
        Self {
            title: None,
            description: None,
            labels: None,
            start: None,
            end: None,
            display_order: Some(display_order),
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.labels = Some(labels.into_iter().collect());
        self
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.labels.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.display_order.is_none()
    }

    /// Returns `true` when the patch changes a schedule date.
    #[must_use]
    pub const fn touches_schedule(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Splits the patch into its schedule part and everything else.
    #[must_use]
    pub fn split_schedule(self) -> (Self, Self) {
        let schedule = Self {
            start: self.start,
            end: self.end,
            ..Self::default()
        };
        let details = Self {
            start: None,
            end: None,
            ..self
        };
        (schedule, details)
    }

    /// Folds a later patch into this one; fields set by `later` win.
    pub fn merge(&mut self, later: Self) {
        if later.title.is_some() {
            self.title = later.title;
        }
        if later.description.is_some() {
            self.description = later.description;
        }
        if later.labels.is_some() {
            self.labels = later.labels;
        }
        if later.start.is_some() {
            self.start = later.start;
        }
        if later.end.is_some() {
            self.end = later.end;
        }
        if later.display_order.is_some() {
            self.display_order = later.display_order;
        }
    }

    /// Applies the patch to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::EndBeforeStart`]; the task is unchanged on error.
    pub fn apply_to(&self, task: &mut Task) -> Result<(), TaskDomainError> {
        if let Some(title) = self.title.as_deref()
            && title.trim().is_empty()
        {
            return Err(TaskDomainError::EmptyTitle);
        }
        if self.touches_schedule() {
            task.reschedule(self.start.or(task.start()), self.end.or(task.end()))?;
        }
        if let Some(title) = self.title.as_deref() {
            task.rename(title)?;
        }
        if let Some(description) = self.description.as_ref() {
            task.set_description(Some(description.clone()));
        }
        if let Some(labels) = self.labels.as_ref() {
            task.set_labels(labels.iter().cloned());
        }
        if self.display_order.is_some() {
            task.set_display_order(self.display_order);
        }
        Ok(())
    }

    /// Restores every field this patch touches from `snapshot`.
    ///
    /// Used to roll back an optimistic update without discarding unrelated
    /// changes made to the task since the snapshot was taken.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskDomainError`] if the snapshot values are rejected.
    pub fn restore(&self, task: &mut Task, snapshot: &Task) -> Result<(), TaskDomainError> {
        if self.touches_schedule() {
            task.reschedule(snapshot.start(), snapshot.end())?;
        }
        if self.title.is_some() {
            task.rename(snapshot.title())?;
        }
        if self.description.is_some() {
            task.set_description(snapshot.description().map(str::to_owned));
        }
        if self.labels.is_some() {
            task.set_labels(snapshot.labels().iter().cloned());
        }
        if self.display_order.is_some() {
            task.set_display_order(snapshot.display_order());
        }
        Ok(())
    }

    /// Returns `true` when applying the patch would not change `task`.
    #[must_use]
    pub fn is_redundant_for(&self, task: &Task) -> bool {
        let mut candidate = task.clone();
        self.apply_to(&mut candidate).is_ok() && candidate == *task
    }
}
