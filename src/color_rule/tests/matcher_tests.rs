//! Tests for pattern matching and rule ranking.

use crate::color_rule::{
    ColorRule, ConditionType, MAX_VISIBLE_RULES, MatchMode, match_pattern, matches_rule,
    matching_rules,
};
use rstest::{fixture, rstest};

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[fixture]
fn ranked_rules() -> Vec<ColorRule> {
    vec![
        ColorRule::new("late", "bug", "#aa0000").with_priority(30),
        ColorRule::new("first", "bug", "#00aa00").with_priority(10),
        ColorRule::new("second", "login", "#0000aa").with_priority(20),
        ColorRule::new("tied", "fix", "#aaaa00").with_priority(20),
        ColorRule::new("never", "deploy", "#00aaaa").with_priority(0),
    ]
}

#[rstest]
#[case(Some("Fix LOGIN bug"), "login", MatchMode::Contains, true)]
#[case(Some("Fix login bug"), "", MatchMode::Contains, true)]
#[case(None, "", MatchMode::Contains, false)]
#[case(None, "login", MatchMode::Contains, false)]
#[case(Some("Release notes"), "login", MatchMode::Contains, false)]
#[case(Some("BUG-42 crash"), r"^bug-\d+", MatchMode::Regex, true)]
#[case(Some("crash BUG-42"), r"^bug-\d+", MatchMode::Regex, false)]
#[case(Some("anything"), "(unclosed", MatchMode::Regex, false)]
#[case(Some("a[b"), "[", MatchMode::Regex, false)]
fn match_pattern_cases(
    #[case] text: Option<&str>,
    #[case] pattern: &str,
    #[case] mode: MatchMode,
    #[case] expected: bool,
) {
    assert_eq!(match_pattern(text, pattern, mode), expected);
}

#[rstest]
fn disabled_rule_never_matches() {
    let rule = ColorRule::new("off", "bug", "#ff0000").with_enabled(false);
    assert!(!matches_rule(Some("bug"), &[], &rule));
}

#[rstest]
fn empty_pattern_rule_never_matches() {
    let rule = ColorRule::new("empty", "", "#ff0000");
    assert!(!matches_rule(Some("anything"), &[], &rule));
}

#[rstest]
fn label_condition_matches_any_label() {
    let rule = ColorRule::new("infra", "infra", "#ff0000").with_condition(ConditionType::Label);
    assert!(matches_rule(
        Some("Unrelated title"),
        &labels(&["backend", "Infrastructure"]),
        &rule
    ));
    assert!(!matches_rule(Some("infra in title"), &labels(&["backend"]), &rule));
}

#[rstest]
fn title_condition_ignores_labels() {
    let rule = ColorRule::new("title", "urgent", "#ff0000");
    assert!(!matches_rule(Some("Routine"), &labels(&["urgent"]), &rule));
}

#[rstest]
fn matching_rules_returns_at_most_three_in_ascending_priority(ranked_rules: Vec<ColorRule>) {
    let matched = matching_rules(Some("Fix login bug"), &[], &ranked_rules);
    let ids: Vec<&str> = matched.iter().map(|rule| rule.id.as_str()).collect();

    assert_eq!(matched.len(), MAX_VISIBLE_RULES);
    assert_eq!(ids, vec!["first", "second", "tied"]);
}

#[rstest]
fn matching_rules_skips_rules_with_invalid_regex() {
    let rules = vec![
        ColorRule::new("broken", "(bug", "#ff0000").with_match_mode(MatchMode::Regex),
        ColorRule::new("valid", "bug", "#00ff00").with_priority(5),
    ];
    let matched = matching_rules(Some("bug report"), &[], &rules);

    assert_eq!(matched.len(), 1);
    assert!(matched.iter().all(|rule| rule.id == "valid"));
}

#[rstest]
fn matching_rules_is_empty_when_nothing_matches(ranked_rules: Vec<ColorRule>) {
    assert!(matching_rules(Some("Write docs"), &[], &ranked_rules).is_empty());
}
