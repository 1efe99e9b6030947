//! PostgreSQL-backed `DoseRecordRepository`.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DoseRecordRepository, DoseRecordRepositoryError};
use crate::domain::{ChildId, DoseRecord, DoseRecordId, DoseStatus};

use super::diesel_basic_error_mapping::{map_corrupt_row, map_diesel_error, map_pool_error};
use super::models::{DoseRecordRow, DoseStatusChangeset};
use super::pool::DbPool;
use super::schema::dose_records;

/// Diesel implementation of [`DoseRecordRepository`].
#[derive(Clone)]
pub struct DieselDoseRecordRepository {
    pool: DbPool,
}

impl DieselDoseRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_to_doses(rows: Vec<DoseRecordRow>) -> Result<Vec<DoseRecord>, DoseRecordRepositoryError> {
    rows.into_iter()
        .map(DoseRecord::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_corrupt_row)
}

#[async_trait]
impl DoseRecordRepository for DieselDoseRecordRepository {
    async fn list_for_child(
        &self,
        child_id: &ChildId,
    ) -> Result<Vec<DoseRecord>, DoseRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DoseRecordRow> = dose_records::table
            .filter(dose_records::child_id.eq(child_id.as_uuid()))
            .order((dose_records::due_date.asc(), dose_records::vaccine_name.asc()))
            .select(DoseRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_doses(rows)
    }

    async fn find_by_id(
        &self,
        dose_id: &DoseRecordId,
    ) -> Result<Option<DoseRecord>, DoseRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<DoseRecordRow> = dose_records::table
            .find(*dose_id.as_uuid())
            .select(DoseRecordRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(DoseRecord::try_from)
            .transpose()
            .map_err(map_corrupt_row)
    }

    async fn save_status(&self, dose: &DoseRecord) -> Result<bool, DoseRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(dose_records::table.find(*dose.id().as_uuid()))
            .set(DoseStatusChangeset::from(dose))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn list_pending_due_on(
        &self,
        due_date: NaiveDate,
    ) -> Result<Vec<DoseRecord>, DoseRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DoseRecordRow> = dose_records::table
            .filter(dose_records::status.eq(DoseStatus::Pending.as_str()))
            .filter(dose_records::due_date.eq(due_date))
            .select(DoseRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_doses(rows)
    }
}
