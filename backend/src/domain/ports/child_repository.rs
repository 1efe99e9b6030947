//! Port for child persistence, including the atomic enrolment write.

use async_trait::async_trait;

use crate::domain::{Child, ChildId, DoseRecord, GuardianId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by child repository adapters.
    pub enum ChildRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "child repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "child repository query failed: {message}",
    }
}

/// Port for reading and writing enrolled children.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChildRepository: Send + Sync {
    /// Persist a child together with its generated schedule.
    ///
    /// Adapters must write the child and every dose in one atomic unit: if
    /// any insert fails, nothing is persisted.
    async fn create_with_schedule(
        &self,
        child: &Child,
        schedule: &[DoseRecord],
    ) -> Result<(), ChildRepositoryError>;

    /// Find a child by id.
    async fn find_by_id(&self, child_id: &ChildId) -> Result<Option<Child>, ChildRepositoryError>;

    /// List the children owned by a guardian, oldest enrolment first.
    async fn list_for_guardian(
        &self,
        guardian_id: &GuardianId,
    ) -> Result<Vec<Child>, ChildRepositoryError>;

    /// Overwrite the mutable profile fields of an existing child.
    ///
    /// Returns `false` when the child no longer exists.
    async fn save_profile(&self, child: &Child) -> Result<bool, ChildRepositoryError>;

    /// Delete a child and all of its dose records atomically.
    ///
    /// Returns `false` when the child did not exist.
    async fn delete_with_schedule(&self, child_id: &ChildId) -> Result<bool, ChildRepositoryError>;
}

/// Fixture implementation for tests that do not exercise child persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChildRepository;

#[async_trait]
impl ChildRepository for FixtureChildRepository {
    async fn create_with_schedule(
        &self,
        _child: &Child,
        _schedule: &[DoseRecord],
    ) -> Result<(), ChildRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _child_id: &ChildId) -> Result<Option<Child>, ChildRepositoryError> {
        Ok(None)
    }

    async fn list_for_guardian(
        &self,
        _guardian_id: &GuardianId,
    ) -> Result<Vec<Child>, ChildRepositoryError> {
        Ok(Vec::new())
    }

    async fn save_profile(&self, _child: &Child) -> Result<bool, ChildRepositoryError> {
        Ok(false)
    }

    async fn delete_with_schedule(&self, _child_id: &ChildId) -> Result<bool, ChildRepositoryError> {
        Ok(false)
    }
}
