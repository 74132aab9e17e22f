//! Sibling reordering across task kinds the provider cannot place next to
//! each other.

mod error;
mod reorder;

pub use error::ReorderError;
pub use reorder::{
    ReorderPlan, ReorderPosition, ReorderResolution, ordered_siblings, renumber, resolve_reorder,
};

