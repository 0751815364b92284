//! Common test utilities for scheduler integration tests.
//!
//! Provides a harness that stands up a full scheduler (store, supervisor,
//! registry, scheduling loop) against fake stage tools written as shell
//! scripts in a tempdir.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
