//! Colour rule value types.

use super::ColorRuleError;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

/// How a rule pattern is compared against text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive substring containment.
    #[default]
    Contains,
    /// Case-insensitive regular expression search.
    Regex,
}

/// Which task attribute a rule inspects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    /// The task title.
    #[default]
    Title,
    /// Each of the task labels; any match counts.
    Label,
}

const fn default_opacity() -> f32 {
    1.0
}

const fn default_enabled() -> bool {
    true
}

/// A priority-ranked pattern rule producing a coloured stripe on a task bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRule {
    /// Stable rule identifier.
    pub id: String,
    /// Human-readable rule name.
    #[serde(default)]
    pub name: String,
    /// Pattern compared against the condition target.
    pub pattern: String,
    /// Comparison mode for [`Self::pattern`].
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Attribute inspected by the rule.
    #[serde(default)]
    pub condition_type: ConditionType,
    /// Display colour, typically a CSS hex string.
    pub color: String,
    /// Stripe opacity in `0.0..=1.0`.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Ordering key; lower values are shown first.
    #[serde(default)]
    pub priority: i32,
    /// Disabled rules never match.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ColorRule {
    /// Creates an enabled title rule using substring matching.
    #[must_use]
    pub fn new(id: impl Into<String>, pattern: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            pattern: pattern.into(),
            match_mode: MatchMode::Contains,
            condition_type: ConditionType::Title,
            color: color.into(),
            opacity: default_opacity(),
            priority: 0,
            enabled: true,
        }
    }

    /// Sets the rule name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the match mode.
    #[must_use]
    pub const fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    /// Sets the condition target.
    #[must_use]
    pub const fn with_condition(mut self, condition_type: ConditionType) -> Self {
        self.condition_type = condition_type;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the opacity.
    #[must_use]
    pub const fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Enables or disables the rule.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Checks that the rule can be stored and displayed.
    ///
    /// Matching itself tolerates invalid rules; validation exists so that
    /// editors can report problems instead of silently never matching.
    ///
    /// # Errors
    ///
    /// Returns a [`ColorRuleError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ColorRuleError> {
        if self.id.trim().is_empty() {
            return Err(ColorRuleError::EmptyId);
        }
        if self.color.trim().is_empty() {
            return Err(ColorRuleError::EmptyColor(self.id.clone()));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ColorRuleError::OpacityOutOfRange {
                id: self.id.clone(),
                opacity: self.opacity,
            });
        }
        if self.match_mode == MatchMode::Regex {
            RegexBuilder::new(&self.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|err| ColorRuleError::InvalidRegex {
                    id: self.id.clone(),
                    reason: err.to_string(),
                })?;
        }
        Ok(())
    }
}
