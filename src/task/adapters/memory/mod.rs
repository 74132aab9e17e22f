//! In-memory adapter implementations.
//!
//! A thread-safe provider with scripted failures, suitable for unit testing
//! and for boards that never leave the local machine.

mod provider;

pub use provider::{InMemoryTaskProvider, ProviderCall, ProviderOperation};
