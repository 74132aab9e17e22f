//! Shared helpers for in-memory provider integration tests.

use chrono::NaiveDate;
use eyre::{Result, eyre};
use mockable::DefaultClock;
use std::sync::Arc;
use trellis::{
    config::TrellisConfig,
    task::{
        adapters::memory::InMemoryTaskProvider,
        domain::{Link, LinkId, LinkKind, LinkRecord, Task, TaskId, TaskKind},
        ports::SyncOptions,
        services::SyncOrchestrator,
    },
};

/// Orchestrator type used across the integration tests.
pub type TestOrchestrator = SyncOrchestrator<InMemoryTaskProvider, DefaultClock>;

/// Builds a date in January 2025.
///
/// # Errors
///
/// Returns an error for a day that does not exist.
pub fn jan(day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 1, day).ok_or_else(|| eyre!("invalid day {day}"))
}

/// Builds a task id.
///
/// # Errors
///
/// Returns an error for zero.
pub fn task_id(value: u64) -> Result<TaskId> {
    Ok(TaskId::new(value)?)
}

/// Builds a scheduled issue.
///
/// # Errors
///
/// Returns an error for invalid ids or inverted dates.
pub fn scheduled_issue(id: u64, title: &str, start: u32, end: u32) -> Result<Task> {
    Ok(Task::new(task_id(id)?, title, TaskKind::issue())
        .with_schedule(Some(jan(start)?), Some(jan(end)?))?)
}

/// Builds a link the provider has already round-tripped.
///
/// # Errors
///
/// Returns an error for invalid ids or a self link.
pub fn native_link(id: u64, source: u64, target: u64, kind: LinkKind) -> Result<Link> {
    let link = Link::new(LinkId::new(id)?, task_id(source)?, task_id(target)?, kind)?;
    Ok(link.with_record(LinkRecord::native(target.to_string())))
}

/// Seeds a provider with tasks and links.
///
/// # Errors
///
/// Returns an error when the provider state cannot be written.
pub fn seeded_provider(
    tasks: impl IntoIterator<Item = Task>,
    links: impl IntoIterator<Item = Link>,
) -> Result<Arc<InMemoryTaskProvider>> {
    let provider = InMemoryTaskProvider::new();
    for task in tasks {
        provider.seed_task(task)?;
    }
    for link in links {
        provider.seed_link(link)?;
    }
    Ok(Arc::new(provider))
}

/// Builds and initializes an orchestrator from board configuration.
///
/// # Errors
///
/// Returns an error when the configuration is invalid or the initial sync
/// fails.
pub async fn loaded(
    provider: &Arc<InMemoryTaskProvider>,
    config: &TrellisConfig,
) -> Result<TestOrchestrator> {
    let mut orchestrator =
        SyncOrchestrator::from_config(Arc::clone(provider), Arc::new(DefaultClock), config)?;
    orchestrator.initialize(SyncOptions::default()).await?;
    Ok(orchestrator)
}
