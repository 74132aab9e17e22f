//! Step definitions for board synchronization scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
