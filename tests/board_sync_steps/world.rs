//! Shared world state for board synchronization BDD scenarios.

use std::sync::Arc;

use chrono::NaiveDate;
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;
use trellis::{
    calendar::parse_calendar_date,
    task::{
        adapters::memory::InMemoryTaskProvider,
        services::{CommandOutcome, SyncOrchestrator, SyncResult},
    },
};

/// Orchestrator type used by the BDD world.
pub type TestOrchestrator = SyncOrchestrator<InMemoryTaskProvider, DefaultClock>;

/// Scenario world for board synchronization behaviour tests.
pub struct BoardWorld {
    pub provider: Arc<InMemoryTaskProvider>,
    pub orchestrator: Option<TestOrchestrator>,
    pub seeded_links: u64,
    pub last_result: Option<SyncResult<CommandOutcome>>,
}

impl BoardWorld {
    /// Creates a world with an empty provider and no loaded board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: Arc::new(InMemoryTaskProvider::new()),
            orchestrator: None,
            seeded_links: 0,
            last_result: None,
        }
    }

    /// Returns the loaded orchestrator.
    pub fn orchestrator(&mut self) -> Result<&mut TestOrchestrator, eyre::Report> {
        self.orchestrator
            .as_mut()
            .ok_or_else(|| eyre::eyre!("board has not been loaded in this scenario"))
    }

    /// Returns the outcome of the last dispatched command.
    pub fn last_result(&self) -> Result<&SyncResult<CommandOutcome>, eyre::Report> {
        self.last_result
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no command was dispatched in this scenario"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Parses a date written in a feature file.
pub fn date(text: &str) -> Result<NaiveDate, eyre::Report> {
    parse_calendar_date(text).wrap_err_with(|| format!("parse scenario date {text}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
