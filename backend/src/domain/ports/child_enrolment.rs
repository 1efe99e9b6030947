//! Driving port for enrolment and child profile management.

use async_trait::async_trait;

use crate::domain::{Child, ChildDraft, ChildId, ChildProfileUpdate, DoseRecord, Error, GuardianId};

/// Use-cases exposed to dashboards and the bulk importer.
///
/// Every operation except `enrol_child` and `list_children` checks that
/// `requested_by` owns the child: a missing child is `NotFound`, a child
/// owned by someone else is `Forbidden`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChildEnrolment: Send + Sync {
    /// Validate the draft, create the child and persist its full schedule
    /// atomically.
    ///
    /// Each call enrols a new child; retrying a successful call creates a
    /// second child with its own schedule.
    async fn enrol_child(
        &self,
        guardian_id: GuardianId,
        draft: ChildDraft,
    ) -> Result<Child, Error>;

    /// Children owned by the guardian.
    async fn list_children(&self, guardian_id: GuardianId) -> Result<Vec<Child>, Error>;

    /// A child owned by the guardian.
    async fn get_child(&self, child_id: ChildId, requested_by: GuardianId) -> Result<Child, Error>;

    /// The child's doses sorted by due date ascending.
    async fn get_schedule(
        &self,
        child_id: ChildId,
        requested_by: GuardianId,
    ) -> Result<Vec<DoseRecord>, Error>;

    /// Apply a profile edit; changing the date of birth is rejected.
    async fn update_profile(
        &self,
        child_id: ChildId,
        requested_by: GuardianId,
        update: ChildProfileUpdate,
    ) -> Result<Child, Error>;

    /// Delete the child and every dose record it owns.
    async fn delete_child(&self, child_id: ChildId, requested_by: GuardianId) -> Result<(), Error>;
}
