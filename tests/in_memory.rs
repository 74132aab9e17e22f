//! In-memory provider integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `config_tests`: Board configuration loading
//! - `scheduling_flow_tests`: Drags, cascades, and reorders end to end
//! - `link_flow_tests`: Link creation and deletion against the provider
//! - `recovery_tests`: Provider failures, rollback, retry, and discard

mod in_memory {
    pub mod helpers;

    mod config_tests;
    mod link_flow_tests;
    mod recovery_tests;
    mod scheduling_flow_tests;
}
