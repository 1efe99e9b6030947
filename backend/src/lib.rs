//! Child immunisation schedules and vaccination reminders.
//!
//! The crate is laid out hexagonally: [`domain`] holds entities, services and
//! ports; [`outbound`] implements the driven ports (PostgreSQL, in-memory,
//! e-mail relay); [`inbound`] exposes the HTTP API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
