//! Date propagation over the task graph.
//!
//! Workday-preserving reschedules for single tasks and cascade moves that
//! shift a parent together with all of its descendants while honouring
//! dependency links. Planning is pure; the orchestrator applies the result.

mod cascade;
mod error;
mod reschedule;

pub use cascade::{CascadePlan, TaskMove, plan_cascade};
pub use error::CascadeError;
pub use reschedule::{WorkdayCorrection, correct_move, shift_days};

