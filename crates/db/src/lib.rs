//! Embedded property-graph store for grax.
//!
//! The store is the persistent context every script execution is bound
//! against: a process-wide node/edge collection behind a cheaply cloned
//! handle, the same object for every execution.

pub mod models;
pub mod store;

pub use store::{Direction, GraphStore, StoreError};
