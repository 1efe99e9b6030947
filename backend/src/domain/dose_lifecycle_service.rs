//! Dose lifecycle domain service.
//!
//! Implements [`DoseStatusCommand`]. Completion dates come from the injected
//! clock, read as a calendar date in the deployment's reference zone; caller
//! input never supplies them.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ownership::{load_owned_child, map_dose_repository_error};
use crate::domain::ports::{
    ChildRepository, DoseRecordRepository, DoseStatusCommand, SetDoseStatusRequest,
};
use crate::domain::{DoseRecord, Error, ErrorCode, ReferenceZone};

/// Service applying status transitions to single dose records.
#[derive(Clone)]
pub struct DoseLifecycleService<C, D> {
    children: Arc<C>,
    doses: Arc<D>,
    clock: Arc<dyn Clock>,
    zone: ReferenceZone,
}

impl<C, D> DoseLifecycleService<C, D> {
    /// Create a service stamping completions with `clock` in `zone`.
    pub fn new(
        children: Arc<C>,
        doses: Arc<D>,
        clock: Arc<dyn Clock>,
        zone: ReferenceZone,
    ) -> Self {
        Self {
            children,
            doses,
            clock,
            zone,
        }
    }
}

#[async_trait]
impl<C, D> DoseStatusCommand for DoseLifecycleService<C, D>
where
    C: ChildRepository,
    D: DoseRecordRepository,
{
    async fn set_status(&self, request: SetDoseStatusRequest) -> Result<DoseRecord, Error> {
        let SetDoseStatusRequest {
            dose_id,
            status,
            notes,
            requested_by,
        } = request;

        let mut dose = self
            .doses
            .find_by_id(&dose_id)
            .await
            .map_err(map_dose_repository_error)?
            .ok_or_else(|| Error::not_found(format!("dose record {dose_id} not found")))?;

        // A dose whose child has vanished reports the dose as missing.
        load_owned_child(self.children.as_ref(), dose.child_id(), requested_by)
            .await
            .map_err(|err| match err.code() {
                ErrorCode::NotFound => {
                    Error::not_found(format!("dose record {dose_id} not found"))
                }
                _ => err,
            })?;

        let today = self.zone.today(self.clock.utc());
        dose.set_status(status, today);
        if let Some(notes) = notes {
            dose.set_notes(notes);
        }

        let saved = self
            .doses
            .save_status(&dose)
            .await
            .map_err(map_dose_repository_error)?;
        if !saved {
            return Err(Error::not_found(format!("dose record {dose_id} not found")));
        }
        Ok(dose)
    }
}

#[cfg(test)]
#[path = "dose_lifecycle_service_tests.rs"]
mod tests;
