//! When steps for board synchronization BDD scenarios.

use super::world::{BoardWorld, date, run_async};
use rstest_bdd_macros::when;
use trellis::task::{
    domain::{TaskId, TaskPatch},
    ordering::ReorderPosition,
    services::Command,
};

fn dispatch(world: &mut BoardWorld, command: Command) -> Result<(), eyre::Report> {
    let result = run_async(world.orchestrator()?.dispatch(command));
    world.last_result = Some(result);
    Ok(())
}

#[when("task {id:u64} is cascaded by {days:i64} days")]
fn cascade(world: &mut BoardWorld, id: u64, days: i64) -> Result<(), eyre::Report> {
    dispatch(
        world,
        Command::CascadeMove {
            parent: TaskId::new(id)?,
            diff_days: days,
        },
    )
}

#[when(r#"task {id:u64} is dragged to "{start}" through "{end}""#)]
fn drag(world: &mut BoardWorld, id: u64, start: String, end: String) -> Result<(), eyre::Report> {
    dispatch(
        world,
        Command::MoveTask {
            id: TaskId::new(id)?,
            start: date(&start)?,
            end: Some(date(&end)?),
        },
    )
}

#[when(r#"task {id:u64} is renamed to "{title}""#)]
fn rename(world: &mut BoardWorld, id: u64, title: String) -> Result<(), eyre::Report> {
    dispatch(
        world,
        Command::EditFields {
            id: TaskId::new(id)?,
            patch: TaskPatch::default().with_title(title),
        },
    )
}

#[when("task {moved:u64} is dropped before task {target:u64}")]
fn drop_before(world: &mut BoardWorld, moved: u64, target: u64) -> Result<(), eyre::Report> {
    dispatch(
        world,
        Command::Reorder {
            moved: TaskId::new(moved)?,
            target: TaskId::new(target)?,
            position: ReorderPosition::Before,
        },
    )
}
