//! Unit tests for the calendar engine.

mod date_tests;
