//! PostgreSQL-backed `ChildRepository`.
//!
//! Enrolment and deletion touch two tables, so both run inside a single
//! transaction: either the child and its whole schedule exist, or neither
//! does.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ChildRepository, ChildRepositoryError};
use crate::domain::{Child, ChildId, DoseRecord, GuardianId};

use super::diesel_basic_error_mapping::{map_corrupt_row, map_diesel_error, map_pool_error};
use super::models::{ChildProfileChangeset, ChildRow, NewChildRow, NewDoseRecordRow};
use super::pool::DbPool;
use super::schema::{children, dose_records};

/// Diesel implementation of [`ChildRepository`].
#[derive(Clone)]
pub struct DieselChildRepository {
    pool: DbPool,
}

impl DieselChildRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_to_children(rows: Vec<ChildRow>) -> Result<Vec<Child>, ChildRepositoryError> {
    rows.into_iter()
        .map(Child::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_corrupt_row)
}

#[async_trait]
impl ChildRepository for DieselChildRepository {
    async fn create_with_schedule(
        &self,
        child: &Child,
        schedule: &[DoseRecord],
    ) -> Result<(), ChildRepositoryError> {
        let child_row = NewChildRow::from(child);
        let dose_rows: Vec<NewDoseRecordRow<'_>> =
            schedule.iter().map(NewDoseRecordRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(children::table)
                    .values(&child_row)
                    .execute(conn)
                    .await?;
                if !dose_rows.is_empty() {
                    diesel::insert_into(dose_records::table)
                        .values(&dose_rows)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, child_id: &ChildId) -> Result<Option<Child>, ChildRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ChildRow> = children::table
            .find(*child_id.as_uuid())
            .select(ChildRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Child::try_from).transpose().map_err(map_corrupt_row)
    }

    async fn list_for_guardian(
        &self,
        guardian_id: &GuardianId,
    ) -> Result<Vec<Child>, ChildRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ChildRow> = children::table
            .filter(children::guardian_id.eq(guardian_id.as_uuid()))
            .order((children::created_at.asc(), children::id.asc()))
            .select(ChildRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_children(rows)
    }

    async fn save_profile(&self, child: &Child) -> Result<bool, ChildRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(children::table.find(*child.id().as_uuid()))
            .set(ChildProfileChangeset::from(child))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn delete_with_schedule(&self, child_id: &ChildId) -> Result<bool, ChildRepositoryError> {
        let id = *child_id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::delete(dose_records::table.filter(dose_records::child_id.eq(id)))
                    .execute(conn)
                    .await?;
                let removed = diesel::delete(children::table.find(id))
                    .execute(conn)
                    .await?;
                Ok(removed > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
