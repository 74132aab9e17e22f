//! Configured colour rules for one board.

use super::{ColorRule, ColorRuleError, matching_rules};
use crate::task::domain::Task;
use std::collections::BTreeSet;

/// An ordered collection of colour rules with unique identifiers.
///
/// Rules with an invalid pattern are kept: they never match, and
/// [`Self::validate_all`] reports them to the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorRuleSet {
    rules: Vec<ColorRule>,
}

impl ColorRuleSet {
    /// Creates a rule set, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ColorRuleError::EmptyId`] or [`ColorRuleError::DuplicateId`]
    /// when rule identifiers are not usable as keys.
    pub fn new(rules: impl IntoIterator<Item = ColorRule>) -> Result<Self, ColorRuleError> {
        let collected: Vec<ColorRule> = rules.into_iter().collect();
        let mut seen = BTreeSet::new();
        for rule in &collected {
            if rule.id.trim().is_empty() {
                return Err(ColorRuleError::EmptyId);
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(ColorRuleError::DuplicateId(rule.id.clone()));
            }
        }
        Ok(Self { rules: collected })
    }

    /// Returns the rules in configured order.
    #[must_use]
    pub fn rules(&self) -> &[ColorRule] {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rule is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns every validation problem, one per offending rule.
    #[must_use]
    pub fn validate_all(&self) -> Vec<ColorRuleError> {
        self.rules
            .iter()
            .filter_map(|rule| rule.validate().err())
            .collect()
    }

    /// Returns the visible rules for a title and label set.
    #[must_use]
    pub fn matching(&self, title: Option<&str>, labels: &[String]) -> Vec<&ColorRule> {
        matching_rules(title, labels, &self.rules)
    }

    /// Returns the visible rules for a task.
    #[must_use]
    pub fn rules_for_task(&self, task: &Task) -> Vec<&ColorRule> {
        self.matching(Some(task.title()), task.labels())
    }
}
