//! Driving port for reading the reminder audit trail.

use async_trait::async_trait;

use crate::domain::{ChildId, DoseRecordId, Error, GuardianId, NotificationLogEntry};

/// Read access to the notification log, scoped to the requesting guardian.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationAuditQuery: Send + Sync {
    /// Log entries for an owned child, newest first.
    async fn list_for_child(
        &self,
        child_id: ChildId,
        requested_by: GuardianId,
    ) -> Result<Vec<NotificationLogEntry>, Error>;

    /// Log entries for a dose of an owned child, newest first.
    async fn list_for_dose(
        &self,
        dose_id: DoseRecordId,
        requested_by: GuardianId,
    ) -> Result<Vec<NotificationLogEntry>, Error>;
}
