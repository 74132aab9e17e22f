//! Trellis: task scheduling and synchronization core for Gantt and Kanban
//! boards.
//!
//! This crate keeps a task and dependency-link graph consistent while users
//! drag, cascade, reorder, and edit tasks, and while remote issue trackers
//! accept or reject those changes.
//!
//! # Architecture
//!
//! Trellis follows hexagonal architecture principles:
//!
//! - **Domain**: Pure scheduling logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for issue tracker providers
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`calendar`]: Workday and holiday arithmetic
//! - [`color_rule`]: Pattern rules that colour task bars
//! - [`config`]: Board configuration
//! - [`task`]: Task graph, link validation, cascades, reordering, and sync

pub mod calendar;
pub mod color_rule;
pub mod config;
pub mod task;
