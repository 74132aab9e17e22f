//! Failure handling: rollback, resync, retry, and discard.

use super::helpers::{jan, loaded, scheduled_issue, seeded_provider, task_id};
use eyre::{Result, bail};
use rstest::rstest;
use trellis::{
    config::TrellisConfig,
    task::{
        adapters::memory::ProviderOperation,
        domain::{Link, Task, TaskPatch},
        ports::ProviderError,
        services::{Command, NotificationLevel, SyncErrorKind, SyncPhase},
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_rename_keeps_concurrent_date_change() -> Result<()> {
    let provider = seeded_provider(
        [scheduled_issue(1, "Original", 6, 7)?],
        Vec::<Link>::new(),
    )?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;
    provider.fail_next(
        ProviderOperation::SyncTask,
        ProviderError::Rejected("title locked".to_owned()),
    )?;

    let err = orchestrator
        .dispatch(Command::EditFields {
            id: task_id(1)?,
            patch: TaskPatch::default().with_title("Renamed"),
        })
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("rename should fail"))?;
    let notification = err.to_notification();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert!(notification.message.contains("title locked"));

    orchestrator
        .dispatch(Command::RescheduleTask {
            id: task_id(1)?,
            start: jan(13)?,
            end: Some(jan(14)?),
        })
        .await?;

    let task = orchestrator.store().task(task_id(1)?).cloned();
    assert_eq!(task.as_ref().map(Task::title), Some("Original"));
    assert_eq!(task.as_ref().and_then(Task::start), Some(jan(13)?));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retry_after_transient_failure_succeeds() -> Result<()> {
    let provider = seeded_provider([scheduled_issue(1, "Task", 6, 7)?], Vec::<Link>::new())?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;
    provider.fail_next(
        ProviderOperation::SyncTask,
        ProviderError::transport(std::io::Error::other("connection reset")),
    )?;

    let Err(err) = orchestrator
        .dispatch(Command::RescheduleTask {
            id: task_id(1)?,
            start: jan(8)?,
            end: Some(jan(9)?),
        })
        .await
    else {
        bail!("first attempt should fail");
    };
    assert_eq!(err.kind(), SyncErrorKind::Persistence);
    let mutation = err
        .mutation()
        .ok_or_else(|| eyre::eyre!("failed change should be kept"))?;

    let outcome = orchestrator.dispatch(Command::Retry(mutation)).await?;

    let retried = outcome
        .mutation
        .and_then(|id| orchestrator.ledger().get(id))
        .map(|change| change.phase());
    assert_eq!(retried, Some(SyncPhase::Confirmed));
    assert_eq!(
        provider
            .remote_task(task_id(1)?)?
            .and_then(|task| task.start()),
        Some(jan(8)?)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retry_of_confirmed_change_is_rejected() -> Result<()> {
    let provider = seeded_provider([scheduled_issue(1, "Task", 6, 7)?], Vec::<Link>::new())?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;
    let outcome = orchestrator
        .dispatch(Command::RescheduleTask {
            id: task_id(1)?,
            start: jan(8)?,
            end: Some(jan(9)?),
        })
        .await?;
    let mutation = outcome
        .mutation
        .ok_or_else(|| eyre::eyre!("update should be recorded"))?;

    let result = orchestrator.dispatch(Command::Retry(mutation)).await;

    assert!(result.is_err());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_failure_leaves_store_untouched() -> Result<()> {
    let provider = seeded_provider([scheduled_issue(1, "Task", 6, 7)?], Vec::<Link>::new())?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;
    let before = orchestrator.snapshot();
    provider.fail_next(
        ProviderOperation::Sync,
        ProviderError::transport(std::io::Error::other("offline")),
    )?;

    let options = orchestrator.sync_options().clone();
    let result = orchestrator.dispatch(Command::Refresh(options)).await;

    assert!(result.is_err());
    assert_eq!(orchestrator.snapshot(), before);
    Ok(())
}
