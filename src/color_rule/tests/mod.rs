//! Unit tests for colour rule matching and validation.

mod matcher_tests;
