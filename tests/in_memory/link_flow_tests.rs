//! Link creation and deletion against the in-memory provider.

use super::helpers::{loaded, native_link, scheduled_issue, seeded_provider, task_id};
use eyre::Result;
use rstest::rstest;
use trellis::{
    config::TrellisConfig,
    task::{
        domain::{Link, LinkId, LinkKind, Task, TaskKind},
        services::{Command, SyncError},
        validation::{LinkProposal, LinkValidationError},
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_link_round_trips_and_can_be_deleted() -> Result<()> {
    let provider = seeded_provider(
        [scheduled_issue(1, "A", 6, 7)?, scheduled_issue(2, "B", 8, 9)?],
        Vec::<Link>::new(),
    )?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;

    orchestrator
        .dispatch(Command::CreateLink(
            LinkProposal::new(1, 2, LinkKind::EndToStart).with_lag(1),
        ))
        .await?;
    let created = orchestrator
        .store()
        .links()
        .next()
        .cloned()
        .ok_or_else(|| eyre::eyre!("link missing after creation"))?;
    assert_eq!(created.lag_days(), 1);
    assert_eq!(provider.remote_link(created.id())?, Some(created.clone()));

    orchestrator
        .dispatch(Command::DeleteLink(created.id()))
        .await?;

    assert!(orchestrator.store().link(created.id()).is_none());
    assert!(provider.remote_link(created.id())?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cycle_is_rejected_without_provider_write() -> Result<()> {
    let provider = seeded_provider(
        [
            scheduled_issue(1, "A", 6, 6)?,
            scheduled_issue(2, "B", 7, 7)?,
            scheduled_issue(3, "C", 8, 8)?,
        ],
        [
            native_link(10, 1, 2, LinkKind::EndToStart)?,
            native_link(11, 2, 3, LinkKind::EndToStart)?,
        ],
    )?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;

    let result = orchestrator
        .dispatch(Command::CreateLink(LinkProposal::new(
            3,
            1,
            LinkKind::EndToStart,
        )))
        .await;

    assert!(matches!(
        result,
        Err(SyncError::Link(LinkValidationError::Cycle { .. }))
    ));
    assert_eq!(orchestrator.store().links().count(), 2);
    assert!(provider.remote_link(LinkId::new(12)?)?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn milestone_cannot_be_linked() -> Result<()> {
    let provider = seeded_provider(
        [
            scheduled_issue(1, "A", 6, 7)?,
            Task::new(task_id(2)?, "Release", TaskKind::milestone()),
        ],
        Vec::<Link>::new(),
    )?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;

    let result = orchestrator
        .dispatch(Command::CreateLink(LinkProposal::new(
            1,
            2,
            LinkKind::EndToStart,
        )))
        .await;

    assert!(matches!(
        result,
        Err(SyncError::Link(LinkValidationError::UnsupportedEndpoint { .. }))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_unknown_link_is_rejected() -> Result<()> {
    let provider = seeded_provider([scheduled_issue(1, "A", 6, 7)?], Vec::<Link>::new())?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;

    let result = orchestrator
        .dispatch(Command::DeleteLink(LinkId::new(99)?))
        .await;

    assert!(matches!(result, Err(SyncError::UnknownLink(_))));
    Ok(())
}
