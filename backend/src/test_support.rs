//! Test utilities for the immunisation crate.
//!
//! Shared doubles for unit tests (in `src/`) and integration tests (in
//! `tests/`, via the `test-support` feature).

pub mod clock;
pub mod delivery;
