//! Crate-level test suites.
//!
//! - `determinism.rs`: same seed and input stream give identical results
//! - `integration.rs`: end-to-end play sessions against the reference host
//! - `helpers.rs`: world setup and input scripting shared by both

mod helpers;
mod integration;

pub use helpers::*;
