//! Pattern matching and rule ranking.

use super::{ColorRule, ConditionType, MatchMode};
use regex::RegexBuilder;
use tracing::debug;

/// Maximum number of rules surfaced for one task.
pub const MAX_VISIBLE_RULES: usize = 3;

/// Tests `text` against `pattern` without regard to case.
///
/// Absent text never matches. An empty pattern matches any present text in
/// [`MatchMode::Contains`]. A pattern that does not compile as a regular
/// expression never matches in [`MatchMode::Regex`].
///
/// # Examples
///
/// ```
/// use trellis::color_rule::{MatchMode, match_pattern};
///
/// assert!(match_pattern(Some("Fix Login bug"), "login", MatchMode::Contains));
/// assert!(match_pattern(Some("BUG-42"), r"^bug-\d+$", MatchMode::Regex));
/// assert!(!match_pattern(Some("anything"), "(unclosed", MatchMode::Regex));
/// ```
#[must_use]
pub fn match_pattern(text: Option<&str>, pattern: &str, mode: MatchMode) -> bool {
    let Some(haystack) = text else {
        return false;
    };
    match mode {
        MatchMode::Contains => haystack.to_lowercase().contains(&pattern.to_lowercase()),
        MatchMode::Regex => match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => regex.is_match(haystack),
            Err(err) => {
                debug!(pattern, error = %err, "ignoring colour rule with invalid regex");
                false
            }
        },
    }
}

/// Returns `true` when an enabled, non-empty rule matches the task title or
/// any of its labels, depending on the rule condition.
#[must_use]
pub fn matches_rule(title: Option<&str>, labels: &[String], rule: &ColorRule) -> bool {
    if !rule.enabled || rule.pattern.is_empty() {
        return false;
    }
    match rule.condition_type {
        ConditionType::Title => match_pattern(title, &rule.pattern, rule.match_mode),
        ConditionType::Label => labels
            .iter()
            .any(|label| match_pattern(Some(label), &rule.pattern, rule.match_mode)),
    }
}

/// Returns up to [`MAX_VISIBLE_RULES`] matching rules in ascending priority
/// order. Rules of equal priority keep their configured order.
#[must_use]
pub fn matching_rules<'a>(
    title: Option<&str>,
    labels: &[String],
    rules: &'a [ColorRule],
) -> Vec<&'a ColorRule> {
    let mut matched: Vec<&ColorRule> = rules
        .iter()
        .filter(|rule| matches_rule(title, labels, rule))
        .collect();
    matched.sort_by_key(|rule| rule.priority);
    matched.truncate(MAX_VISIBLE_RULES);
    matched
}
