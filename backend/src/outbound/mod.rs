//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: in-memory repositories for offline runs and tests.
//! - **delivery**: reminder transports.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod delivery;
pub mod memory;
pub mod persistence;
