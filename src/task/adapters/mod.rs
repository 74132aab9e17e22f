//! Provider adapters for the task graph.
//!
//! Adapters implement the [`TaskProvider`] port. Remote trackers live in the
//! host application; this crate ships the in-memory provider used by tests
//! and local boards.
//!
//! [`TaskProvider`]: crate::task::ports::TaskProvider

pub mod memory;
