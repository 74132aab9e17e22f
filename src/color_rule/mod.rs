//! Colour rule evaluation over task titles and labels.
//!
//! Rules are pattern matchers ranked by priority. Several rules can match a
//! task; the presentation layer shows at most [`MAX_VISIBLE_RULES`] of them,
//! lowest priority value first. Matching is read-only and never fails: a
//! malformed regular expression simply does not match.

mod error;
mod matcher;
mod rule;
mod rule_set;

pub use error::ColorRuleError;
pub use matcher::{MAX_VISIBLE_RULES, match_pattern, matches_rule, matching_rules};
pub use rule::{ColorRule, ConditionType, MatchMode};
pub use rule_set::ColorRuleSet;

#[cfg(test)]
mod tests;
