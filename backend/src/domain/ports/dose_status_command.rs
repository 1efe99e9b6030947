//! Driving port for dose status changes.

use async_trait::async_trait;

use crate::domain::{DoseRecord, DoseRecordId, DoseStatus, Error, GuardianId};

/// Request to move a dose to a new status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDoseStatusRequest {
    pub dose_id: DoseRecordId,
    pub status: DoseStatus,
    /// Replacement notes; `None` keeps the current notes.
    pub notes: Option<String>,
    pub requested_by: GuardianId,
}

/// Use-case for the dose lifecycle.
///
/// Status changes never trigger notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoseStatusCommand: Send + Sync {
    /// Apply the status change and return the stored dose.
    ///
    /// The completion date always comes from the server clock.
    async fn set_status(&self, request: SetDoseStatusRequest) -> Result<DoseRecord, Error>;
}
