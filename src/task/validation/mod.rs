//! Dependency link validation.
//!
//! Endpoint checks for proposed links, cycle filtering over a whole link
//! set, and provenance classification required before a link can be
//! deleted remotely. Every function here is pure: it inspects its inputs
//! and returns a verdict without touching the store.

mod cycles;
mod error;
mod links;
mod provenance;

pub use cycles::{CycleReport, DirectedEdge, filter_cycles};
pub use error::LinkValidationError;
pub use links::{LinkProposal, validate_endpoint_kinds, validate_link, validate_new_link};
pub use provenance::{LinkDeletion, classify_deletion};
