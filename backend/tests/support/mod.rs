//! Shared helpers for integration suites that need embedded PostgreSQL.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the cluster policy and database provisioning live here rather than in
//! each suite.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{format_postgres_error, provision_migrated_database};
