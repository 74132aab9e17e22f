//! Board configuration loaded by the host application.
//!
//! The core performs no file I/O; callers hand in JSON text or build the
//! structures directly.

use crate::{
    calendar::{CalendarError, Holiday, WorkCalendar, parse_calendar_date},
    color_rule::{ColorRule, ColorRuleError, ColorRuleSet},
    task::domain::ProviderKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while loading configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// The JSON document is malformed.
    #[error("invalid configuration: {0}")]
    Parse(String),

    /// A calendar date could not be parsed.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// The colour rules are unusable.
    #[error(transparent)]
    ColorRule(#[from] ColorRuleError),
}

/// One configured holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    /// Date text such as `2025-01-08` or `2025/1/8`.
    pub date: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Holiday and workday-override lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Non-working dates.
    #[serde(default)]
    pub holidays: Vec<HolidayEntry>,
    /// Weekend dates that are working days.
    #[serde(default)]
    pub workday_overrides: Vec<String>,
}

impl CalendarConfig {
    /// Builds the calendar.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDate`] for the first unparsable date.
    pub fn build(&self) -> Result<WorkCalendar, CalendarError> {
        let holidays = self
            .holidays
            .iter()
            .map(|entry| Holiday::parse(&entry.date, entry.name.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        let overrides = self
            .workday_overrides
            .iter()
            .map(String::as_str)
            .map(parse_calendar_date)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(WorkCalendar::new(holidays, overrides))
    }
}

/// Core configuration for one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrellisConfig {
    /// Working calendar.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Colour rules in configured order.
    #[serde(default)]
    pub color_rules: Vec<ColorRule>,
    /// Keep a task's workday count when it is dragged to new dates.
    #[serde(default = "default_preserve_workdays")]
    pub preserve_workdays_on_move: bool,
}

const fn default_preserve_workdays() -> bool {
    true
}

impl Default for TrellisConfig {
    fn default() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            color_rules: Vec::new(),
            preserve_workdays_on_move: default_preserve_workdays(),
        }
    }
}

impl TrellisConfig {
    /// Creates a configuration that takes dragged dates as they are.
    ///
    /// Useful for boards that track calendar days rather than workdays.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            preserve_workdays_on_move: false,
            ..Default::default()
        }
    }

    /// Parses a JSON document; missing sections take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Builds the working calendar.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Calendar`] for an unparsable date.
    pub fn calendar(&self) -> Result<WorkCalendar, ConfigError> {
        Ok(self.calendar.build()?)
    }

    /// Builds the colour rule set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ColorRule`] for empty or duplicate rule ids.
    pub fn color_rules(&self) -> Result<ColorRuleSet, ConfigError> {
        Ok(ColorRuleSet::new(self.color_rules.iter().cloned())?)
    }
}

/// Static description of a provider connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider family.
    pub provider: ProviderKind,
    /// Base URL of the remote instance; empty for local providers.
    #[serde(default)]
    pub base_url: String,
    /// Project path or identifier.
    pub project: String,
    /// `true` when writes are disabled by configuration.
    #[serde(default)]
    pub read_only: bool,
}

impl ProviderConfig {
    /// Creates a writable configuration without base URL.
    #[must_use]
    pub fn new(provider: ProviderKind, project: impl Into<String>) -> Self {
        Self {
            provider,
            base_url: String::new(),
            project: project.into(),
            read_only: false,
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Marks the provider read-only.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}
