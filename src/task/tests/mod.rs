//! Unit tests for the task graph.

mod fixtures;
