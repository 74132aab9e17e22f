//! Behaviour tests for optimistic board synchronization.

mod board_sync_steps;

use board_sync_steps::world::{BoardWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/board_sync.feature",
    name = "Cascading a parent moves its linked child"
)]
#[tokio::test(flavor = "multi_thread")]
async fn cascade_moves_linked_child(world: BoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/board_sync.feature",
    name = "Dragging a task keeps its workday count"
)]
#[tokio::test(flavor = "multi_thread")]
async fn drag_keeps_workdays(world: BoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/board_sync.feature",
    name = "A rejected edit is rolled back"
)]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_edit_rolls_back(world: BoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/board_sync.feature",
    name = "Dropping an issue on a milestone re-anchors it"
)]
#[tokio::test(flavor = "multi_thread")]
async fn milestone_drop_reanchors(world: BoardWorld) {
    let _ = world;
}
