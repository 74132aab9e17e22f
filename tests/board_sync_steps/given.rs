//! Given steps for board synchronization BDD scenarios.

use super::world::{BoardWorld, date, run_async};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use std::sync::Arc;
use trellis::{
    calendar::WorkCalendar,
    color_rule::ColorRuleSet,
    task::{
        adapters::memory::ProviderOperation,
        domain::{Link, LinkId, LinkKind, LinkRecord, Task, TaskId, TaskKind},
        ports::{ProviderError, SyncOptions},
        services::SyncOrchestrator,
    },
};

fn scheduled(id: u64, title: &str, start: &str, end: &str) -> Result<Task, eyre::Report> {
    Ok(Task::new(TaskId::new(id)?, title, TaskKind::issue())
        .with_schedule(Some(date(start)?), Some(date(end)?))?)
}

#[given(r#"task {id:u64} "{title}" scheduled from "{start}" to "{end}""#)]
fn scheduled_task(
    world: &mut BoardWorld,
    id: u64,
    title: String,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    world
        .provider
        .seed_task(scheduled(id, &title, &start, &end)?)?;
    Ok(())
}

#[given(r#"task {id:u64} "{title}" under task {parent:u64} scheduled from "{start}" to "{end}""#)]
fn scheduled_child(
    world: &mut BoardWorld,
    id: u64,
    title: String,
    parent: u64,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let task = scheduled(id, &title, &start, &end)?.with_parent(TaskId::new(parent)?);
    world.provider.seed_task(task)?;
    Ok(())
}

#[given("task {source:u64} blocks task {target:u64}")]
fn blocking_link(world: &mut BoardWorld, source: u64, target: u64) -> Result<(), eyre::Report> {
    world.seeded_links = world.seeded_links.saturating_add(1);
    let link = Link::new(
        LinkId::new(world.seeded_links)?,
        TaskId::new(source)?,
        TaskId::new(target)?,
        LinkKind::EndToStart,
    )?
    .with_record(LinkRecord::native(target.to_string()));
    world.provider.seed_link(link)?;
    Ok(())
}

#[given(r#"milestone {id:u64} "{title}" at position {order:i64}"#)]
fn milestone_at(
    world: &mut BoardWorld,
    id: u64,
    title: String,
    order: i64,
) -> Result<(), eyre::Report> {
    let task = Task::new(TaskId::new(id)?, title, TaskKind::milestone()).with_display_order(order);
    world.provider.seed_task(task)?;
    Ok(())
}

#[given(r#"issue {id:u64} "{title}" at position {order:i64}"#)]
fn issue_at(world: &mut BoardWorld, id: u64, title: String, order: i64) -> Result<(), eyre::Report> {
    let task = Task::new(TaskId::new(id)?, title, TaskKind::issue()).with_display_order(order);
    world.provider.seed_task(task)?;
    Ok(())
}

#[given("the board is loaded")]
fn board_loaded(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let mut orchestrator = SyncOrchestrator::new(
        Arc::clone(&world.provider),
        Arc::new(DefaultClock),
        WorkCalendar::default(),
        ColorRuleSet::default(),
    );
    run_async(orchestrator.initialize(SyncOptions::default())).wrap_err("load board")?;
    world.orchestrator = Some(orchestrator);
    Ok(())
}

#[given("the provider rejects the next task update")]
fn provider_rejects_update(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    world.provider.fail_next(
        ProviderOperation::SyncTask,
        ProviderError::Rejected("update refused".to_owned()),
    )?;
    Ok(())
}
