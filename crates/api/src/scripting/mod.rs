//! Script execution over the graph store.
//!
//! [`environment`] supplies the Rhai-facing graph API (engine factory and
//! binding wrappers), [`gateway`] coordinates one execution end to end,
//! and [`representation`] converts script results into response JSON.

pub mod environment;
pub mod gateway;
pub mod representation;
