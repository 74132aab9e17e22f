//! Task graph scheduling and synchronization.
//!
//! Tasks and dependency links form a graph that users manipulate through
//! drags, cascades, reorders, and edits. The module follows hexagonal
//! architecture:
//!
//! - Domain types and the versioned store in [`domain`]
//! - Link validation and cycle filtering in [`validation`]
//! - Date propagation in [`scheduling`]
//! - Sibling reordering in [`ordering`]
//! - Provider contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The sync orchestrator in [`services`]

pub mod adapters;
pub mod domain;
pub mod ordering;
pub mod ports;
pub mod scheduling;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
