//! PostgreSQL-backed `NotificationLogRepository`.
//!
//! Insert-only: no update or delete statement exists for this table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationLogRepository, NotificationLogRepositoryError};
use crate::domain::{ChildId, DoseRecordId, NotificationLogEntry};

use super::diesel_basic_error_mapping::{map_corrupt_row, map_diesel_error, map_pool_error};
use super::models::{NewNotificationLogRow, NotificationLogRow};
use super::pool::DbPool;
use super::schema::notification_log;

/// Diesel implementation of [`NotificationLogRepository`].
#[derive(Clone)]
pub struct DieselNotificationLogRepository {
    pool: DbPool,
}

impl DieselNotificationLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_to_entries(
    rows: Vec<NotificationLogRow>,
) -> Result<Vec<NotificationLogEntry>, NotificationLogRepositoryError> {
    rows.into_iter()
        .map(NotificationLogEntry::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_corrupt_row)
}

#[async_trait]
impl NotificationLogRepository for DieselNotificationLogRepository {
    async fn append(
        &self,
        entry: &NotificationLogEntry,
    ) -> Result<(), NotificationLogRepositoryError> {
        let row = NewNotificationLogRow::from(entry);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(notification_log::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_child(
        &self,
        child_id: &ChildId,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NotificationLogRow> = notification_log::table
            .filter(notification_log::child_id.eq(child_id.as_uuid()))
            .order(notification_log::sent_at.desc())
            .select(NotificationLogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_entries(rows)
    }

    async fn list_for_dose(
        &self,
        dose_id: &DoseRecordId,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NotificationLogRow> = notification_log::table
            .filter(notification_log::dose_record_id.eq(dose_id.as_uuid()))
            .order(notification_log::sent_at.desc())
            .select(NotificationLogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_entries(rows)
    }
}
