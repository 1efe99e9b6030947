//! Notification audit domain service.
//!
//! Read-only view of the reminder log for the guardian who owns the child.
//! Entries outlive their child, but once a child is deleted its history can
//! no longer be reached through this service because ownership cannot be
//! proven.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ownership::{
    load_owned_child, map_dose_repository_error, map_notification_log_error,
};
use crate::domain::ports::{
    ChildRepository, DoseRecordRepository, NotificationAuditQuery, NotificationLogRepository,
};
use crate::domain::{ChildId, DoseRecordId, Error, GuardianId, NotificationLogEntry};

/// Audit query service over the notification log.
#[derive(Clone)]
pub struct NotificationAuditService<C, D, L> {
    children: Arc<C>,
    doses: Arc<D>,
    log: Arc<L>,
}

impl<C, D, L> NotificationAuditService<C, D, L> {
    pub fn new(children: Arc<C>, doses: Arc<D>, log: Arc<L>) -> Self {
        Self {
            children,
            doses,
            log,
        }
    }
}

fn newest_first(mut entries: Vec<NotificationLogEntry>) -> Vec<NotificationLogEntry> {
    entries.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
    entries
}

#[async_trait]
impl<C, D, L> NotificationAuditQuery for NotificationAuditService<C, D, L>
where
    C: ChildRepository,
    D: DoseRecordRepository,
    L: NotificationLogRepository,
{
    async fn list_for_child(
        &self,
        child_id: ChildId,
        requested_by: GuardianId,
    ) -> Result<Vec<NotificationLogEntry>, Error> {
        load_owned_child(self.children.as_ref(), child_id, requested_by).await?;
        let entries = self
            .log
            .list_for_child(&child_id)
            .await
            .map_err(map_notification_log_error)?;
        Ok(newest_first(entries))
    }

    async fn list_for_dose(
        &self,
        dose_id: DoseRecordId,
        requested_by: GuardianId,
    ) -> Result<Vec<NotificationLogEntry>, Error> {
        let dose = self
            .doses
            .find_by_id(&dose_id)
            .await
            .map_err(map_dose_repository_error)?
            .ok_or_else(|| Error::not_found(format!("dose record {dose_id} not found")))?;
        load_owned_child(self.children.as_ref(), dose.child_id(), requested_by).await?;
        let entries = self
            .log
            .list_for_dose(&dose_id)
            .await
            .map_err(map_notification_log_error)?;
        Ok(newest_first(entries))
    }
}
