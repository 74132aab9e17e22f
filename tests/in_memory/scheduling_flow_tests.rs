//! End-to-end scheduling flows against the in-memory provider.

use super::helpers::{jan, loaded, native_link, scheduled_issue, seeded_provider, task_id};
use eyre::Result;
use rstest::rstest;
use trellis::{
    config::TrellisConfig,
    task::{
        adapters::memory::ProviderCall,
        domain::{Link, LinkKind, Task, TaskId, TaskKind},
        ordering::{ReorderPosition, ordered_siblings},
        services::{Command, NotificationLevel},
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cascade_reaches_provider_and_matches_local_state() -> Result<()> {
    let provider = seeded_provider(
        [
            scheduled_issue(1, "Epic", 6, 7)?,
            scheduled_issue(2, "Design", 8, 9)?.with_parent(task_id(1)?),
            scheduled_issue(3, "Build", 10, 10)?.with_parent(task_id(1)?),
        ],
        [native_link(10, 2, 3, LinkKind::EndToStart)?],
    )?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;

    let outcome = orchestrator
        .dispatch(Command::CascadeMove {
            parent: task_id(1)?,
            diff_days: 7,
        })
        .await?;

    assert_eq!(outcome.affected.len(), 3);
    assert!(
        outcome
            .notifications
            .iter()
            .any(|note| note.level == NotificationLevel::Success && note.message == "Moved 3 tasks")
    );
    for id in [1, 2, 3] {
        let local = orchestrator.store().task(task_id(id)?).cloned();
        let remote = provider.remote_task(task_id(id)?)?;
        assert_eq!(local, remote, "task {id} diverged from the provider");
    }
    // Build follows Design's new end (Thu 16) and starts Friday.
    assert_eq!(
        orchestrator.store().task(task_id(3)?).and_then(Task::start),
        Some(jan(17)?)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn zero_day_cascade_changes_nothing() -> Result<()> {
    let provider = seeded_provider([scheduled_issue(1, "Epic", 6, 7)?], Vec::<Link>::new())?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;
    let version = orchestrator.store().version();

    let outcome = orchestrator
        .dispatch(Command::CascadeMove {
            parent: task_id(1)?,
            diff_days: 0,
        })
        .await?;

    assert!(outcome.is_noop());
    assert_eq!(orchestrator.store().version(), version);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resize_only_touches_end() -> Result<()> {
    let provider = seeded_provider([scheduled_issue(1, "Task", 6, 7)?], Vec::<Link>::new())?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;

    orchestrator
        .dispatch(Command::ResizeTask {
            id: task_id(1)?,
            end: jan(10)?,
        })
        .await?;

    let calls = provider.calls()?;
    let Some(ProviderCall::SyncTask { patch, .. }) = calls.last() else {
        eyre::bail!("expected a task update, got {calls:?}");
    };
    assert_eq!(patch.start, None);
    assert_eq!(patch.end, Some(jan(10)?));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_updates_provider_positions() -> Result<()> {
    let sibling = |id: u64, order: i64| -> Result<Task> {
        Ok(Task::new(task_id(id)?, format!("Task {id}"), TaskKind::issue())
            .with_display_order(order))
    };
    let provider = seeded_provider(
        [sibling(1, 1)?, sibling(2, 2)?, sibling(3, 3)?],
        Vec::<Link>::new(),
    )?;
    let mut orchestrator = loaded(&provider, &TrellisConfig::default()).await?;

    orchestrator
        .dispatch(Command::Reorder {
            moved: task_id(3)?,
            target: task_id(3)?,
            position: ReorderPosition::After,
        })
        .await?;

    let local: Vec<TaskId> = ordered_siblings(orchestrator.store(), None)
        .iter()
        .map(|task| task.id())
        .collect();
    assert_eq!(local, vec![task_id(3)?, task_id(1)?, task_id(2)?]);
    let remote_orders: Vec<Option<i64>> = [1, 2, 3]
        .into_iter()
        .map(|id| -> Result<Option<i64>> {
            Ok(provider
                .remote_task(task_id(id)?)?
                .and_then(|task| task.display_order()))
        })
        .collect::<Result<_>>()?;
    assert_eq!(remote_orders, vec![Some(2), Some(3), Some(1)]);
    Ok(())
}
