//! PostgreSQL persistence adapters using Diesel.
//!
//! - Thin adapters: repositories translate between Diesel rows and domain
//!   types and hold no business rules.
//! - Rows (`models.rs`) and table definitions (`schema.rs`) never leave this
//!   module.
//! - Connections come from a `bb8` pool through `diesel-async`.
//! - Database failures are mapped to the port's `Connection` or `Query`
//!   variant; SQL detail is logged at `debug` only.
//!
//! # Example
//!
//! ```ignore
//! use immunisation::outbound::persistence::{DbPool, DieselChildRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/immunisation")).await?;
//! let children = DieselChildRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_child_repository;
mod diesel_dose_record_repository;
mod diesel_guardian_directory;
mod diesel_notification_log_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_child_repository::DieselChildRepository;
pub use diesel_dose_record_repository::DieselDoseRecordRepository;
pub use diesel_guardian_directory::DieselGuardianDirectory;
pub use diesel_notification_log_repository::DieselNotificationLogRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
