//! Enrolment domain service.
//!
//! Implements the [`ChildEnrolment`] driving port: enrolment with atomic
//! schedule generation, schedule reads, profile edits and cascade deletion.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ownership::{
    load_owned_child, map_child_repository_error, map_dose_repository_error,
};
use crate::domain::ports::{ChildEnrolment, ChildRepository, DoseRecordRepository};
use crate::domain::{
    Child, ChildDraft, ChildId, ChildProfileUpdate, ChildValidationError, DoseRecord, Error,
    GuardianId, VaccineCatalogue, generate_schedule,
};

fn map_validation_error(error: ChildValidationError) -> Error {
    match &error {
        ChildValidationError::MissingFields { fields } => {
            Error::invalid_request(error.to_string()).with_details(json!({
                "missingFields": fields,
            }))
        }
        ChildValidationError::BlankName
        | ChildValidationError::NameTooLong { .. }
        | ChildValidationError::DateOfBirthImmutable
        | ChildValidationError::UnknownGender
        | ChildValidationError::UnknownBloodGroup => Error::invalid_request(error.to_string()),
    }
}

/// Enrolment service over child and dose record repositories.
#[derive(Clone)]
pub struct ChildEnrolmentService<C, D> {
    children: Arc<C>,
    doses: Arc<D>,
    catalogue: Arc<VaccineCatalogue>,
}

impl<C, D> ChildEnrolmentService<C, D> {
    /// Create a service generating schedules from `catalogue`.
    pub fn new(children: Arc<C>, doses: Arc<D>, catalogue: Arc<VaccineCatalogue>) -> Self {
        Self {
            children,
            doses,
            catalogue,
        }
    }

    fn catalogue_position(&self, vaccine_name: &str) -> usize {
        self.catalogue
            .entries()
            .iter()
            .position(|entry| entry.name() == vaccine_name)
            .unwrap_or(usize::MAX)
    }

    /// Due date ascending; same-day doses keep catalogue order, and doses no
    /// longer in the catalogue sort last by name.
    fn sort_schedule(&self, doses: &mut [DoseRecord]) {
        doses.sort_by_cached_key(|dose| {
            (
                dose.due_date(),
                self.catalogue_position(dose.vaccine_name()),
                dose.vaccine_name().to_owned(),
            )
        });
    }
}

#[async_trait]
impl<C, D> ChildEnrolment for ChildEnrolmentService<C, D>
where
    C: ChildRepository,
    D: DoseRecordRepository,
{
    async fn enrol_child(&self, guardian_id: GuardianId, draft: ChildDraft) -> Result<Child, Error> {
        let child =
            Child::enrol(ChildId::random(), guardian_id, draft).map_err(map_validation_error)?;
        let schedule = generate_schedule(child.id(), child.date_of_birth(), &self.catalogue)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.children
            .create_with_schedule(&child, &schedule)
            .await
            .map_err(map_child_repository_error)?;

        Ok(child)
    }

    async fn list_children(&self, guardian_id: GuardianId) -> Result<Vec<Child>, Error> {
        self.children
            .list_for_guardian(&guardian_id)
            .await
            .map_err(map_child_repository_error)
    }

    async fn get_child(&self, child_id: ChildId, requested_by: GuardianId) -> Result<Child, Error> {
        load_owned_child(self.children.as_ref(), child_id, requested_by).await
    }

    async fn get_schedule(
        &self,
        child_id: ChildId,
        requested_by: GuardianId,
    ) -> Result<Vec<DoseRecord>, Error> {
        let child = load_owned_child(self.children.as_ref(), child_id, requested_by).await?;
        let mut doses = self
            .doses
            .list_for_child(&child.id())
            .await
            .map_err(map_dose_repository_error)?;
        self.sort_schedule(&mut doses);
        Ok(doses)
    }

    async fn update_profile(
        &self,
        child_id: ChildId,
        requested_by: GuardianId,
        update: ChildProfileUpdate,
    ) -> Result<Child, Error> {
        let child = load_owned_child(self.children.as_ref(), child_id, requested_by).await?;
        let updated = child.apply_update(update).map_err(map_validation_error)?;

        let saved = self
            .children
            .save_profile(&updated)
            .await
            .map_err(map_child_repository_error)?;
        if !saved {
            return Err(Error::not_found(format!("child {child_id} not found")));
        }
        Ok(updated)
    }

    async fn delete_child(&self, child_id: ChildId, requested_by: GuardianId) -> Result<(), Error> {
        load_owned_child(self.children.as_ref(), child_id, requested_by).await?;
        let deleted = self
            .children
            .delete_with_schedule(&child_id)
            .await
            .map_err(map_child_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("child {child_id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "enrolment_service_tests.rs"]
mod tests;
