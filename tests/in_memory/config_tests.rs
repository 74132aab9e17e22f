//! Integration tests for board configuration.

use super::helpers::{jan, loaded, scheduled_issue, seeded_provider, task_id};
use eyre::Result;
use rstest::rstest;
use trellis::{
    color_rule::ColorRuleError,
    config::{ConfigError, TrellisConfig},
    task::{
        domain::{Link, Task},
        services::Command,
    },
};

const BOARD: &str = r##"{
    "calendar": {
        "holidays": [
            { "date": "2025/1/8", "name": "Founders' Day" }
        ],
        "workday_overrides": ["2025-01-11"]
    },
    "color_rules": [
        { "id": "bugs", "pattern": "bug", "color": "#ff0000", "priority": 2 },
        { "id": "urgent", "pattern": "^urgent$", "match_mode": "regex",
          "condition_type": "label", "color": "#ffaa00", "priority": 1 }
    ]
}"##;

#[rstest]
fn board_configuration_parses_with_defaults() -> Result<()> {
    let config = TrellisConfig::from_json(BOARD)?;

    assert!(config.preserve_workdays_on_move);
    let calendar = config.calendar()?;
    assert!(calendar.is_holiday(jan(8)?));
    assert_eq!(calendar.holiday_name(jan(8)?), Some("Founders' Day"));
    assert!(calendar.is_workday(jan(11)?));
    assert_eq!(config.color_rules()?.len(), 2);
    Ok(())
}

#[rstest]
#[case(r#"{ "calendar": { "holidays": [{ "date": "not a date" }] } }"#)]
#[case(r#"{ "calendar": { "workday_overrides": ["2025-02-30"] } }"#)]
fn bad_calendar_dates_are_rejected(#[case] text: &str) -> Result<()> {
    let config = TrellisConfig::from_json(text)?;
    assert!(matches!(config.calendar(), Err(ConfigError::Calendar(_))));
    Ok(())
}

#[rstest]
fn duplicate_rule_ids_are_rejected() -> Result<()> {
    let config = TrellisConfig::from_json(
        r##"{ "color_rules": [
            { "id": "a", "pattern": "x", "color": "#000" },
            { "id": "a", "pattern": "y", "color": "#fff" }
        ] }"##,
    )?;
    assert!(matches!(
        config.color_rules(),
        Err(ConfigError::ColorRule(ColorRuleError::DuplicateId(_)))
    ));
    Ok(())
}

#[rstest]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        TrellisConfig::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn holidays_from_configuration_shape_moves() -> Result<()> {
    let config = TrellisConfig::from_json(BOARD)?;
    // Mon..Tue, two workdays.
    let provider = seeded_provider([scheduled_issue(1, "Fix bug", 6, 7)?], Vec::<Link>::new())?;
    let mut orchestrator = loaded(&provider, &config).await?;

    orchestrator
        .dispatch(Command::MoveTask {
            id: task_id(1)?,
            start: jan(7)?,
            end: Some(jan(8)?),
        })
        .await?;

    // Wednesday is a holiday, so the second workday is Thursday.
    assert_eq!(
        orchestrator.store().task(task_id(1)?).and_then(Task::end),
        Some(jan(9)?)
    );
    let rules: Vec<&str> = orchestrator
        .matching_rules_for(task_id(1)?)
        .into_iter()
        .map(|rule| rule.id.as_str())
        .collect();
    assert_eq!(rules, vec!["bugs"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lenient_board_keeps_dropped_dates() -> Result<()> {
    let provider = seeded_provider([scheduled_issue(1, "Plain", 6, 7)?], Vec::<Link>::new())?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::lenient()).await?;

    let outcome = orchestrator
        .dispatch(Command::MoveTask {
            id: task_id(1)?,
            start: jan(10)?,
            end: Some(jan(11)?),
        })
        .await?;

    assert_eq!(
        orchestrator.store().task(task_id(1)?).and_then(Task::end),
        Some(jan(11)?)
    );
    assert_eq!(outcome.notifications.len(), 1);
    Ok(())
}
