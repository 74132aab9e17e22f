//! Then steps for board synchronization BDD scenarios.

use super::world::{BoardWorld, date};
use rstest_bdd_macros::then;
use trellis::task::{
    adapters::memory::ProviderCall,
    domain::{Task, TaskId},
    ordering::ReorderPosition,
    services::{NotificationLevel, SyncErrorKind},
};

fn task(world: &mut BoardWorld, id: u64) -> Result<Task, eyre::Report> {
    let task_id = TaskId::new(id)?;
    world
        .orchestrator()?
        .store()
        .task(task_id)
        .cloned()
        .ok_or_else(|| eyre::eyre!("task {task_id} missing from the board"))
}

#[then(r#"task {id:u64} is scheduled from "{start}" to "{end}""#)]
fn scheduled_between(
    world: &mut BoardWorld,
    id: u64,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let found = task(world, id)?;
    eyre::ensure!(
        found.start() == Some(date(&start)?) && found.end() == Some(date(&end)?),
        "task {id} is scheduled {:?}..{:?}, expected {start}..{end}",
        found.start(),
        found.end()
    );
    Ok(())
}

#[then(r#"task {id:u64} is titled "{title}""#)]
fn titled(world: &mut BoardWorld, id: u64, title: String) -> Result<(), eyre::Report> {
    let found = task(world, id)?;
    eyre::ensure!(
        found.title() == title,
        "task {id} is titled {:?}, expected {title:?}",
        found.title()
    );
    Ok(())
}

#[then("the provider received {count:usize} task updates")]
fn provider_updates(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let updates = world
        .provider
        .calls()?
        .iter()
        .filter(|call| matches!(call, ProviderCall::SyncTask { .. }))
        .count();
    eyre::ensure!(updates == count, "expected {count} task updates, got {updates}");
    Ok(())
}

#[then("an info notification is shown")]
fn info_notification(world: &BoardWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .last_result()?
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected command failure: {err}"))?;
    eyre::ensure!(
        outcome
            .notifications
            .iter()
            .any(|note| note.level == NotificationLevel::Info),
        "expected an info notification, got {:?}",
        outcome.notifications
    );
    Ok(())
}

#[then("the command fails with a persistence error")]
fn persistence_failure(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_result()? {
        Err(err) if err.kind() == SyncErrorKind::Persistence => Ok(()),
        other => Err(eyre::eyre!("expected a persistence error, got {other:?}")),
    }
}

#[then("the provider placed task {moved:u64} before task {anchor:u64}")]
fn provider_placed(world: &BoardWorld, moved: u64, anchor: u64) -> Result<(), eyre::Report> {
    let expected = ProviderCall::ReorderTask {
        moved: TaskId::new(moved)?,
        anchor: TaskId::new(anchor)?,
        position: ReorderPosition::Before,
    };
    let calls = world.provider.calls()?;
    eyre::ensure!(
        calls.contains(&expected),
        "expected {expected:?} among {calls:?}"
    );
    Ok(())
}
