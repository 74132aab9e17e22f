//! Port contracts for the task graph.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod provider;

pub use provider::{
    FilterOptions, LinkDeletionRequest, ProviderError, ProviderResult, SyncMetadata, SyncOptions,
    SyncSnapshot, TaskProvider,
};
