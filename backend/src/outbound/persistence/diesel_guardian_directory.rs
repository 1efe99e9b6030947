//! PostgreSQL-backed `GuardianDirectory` over the mirrored guardians table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GuardianDirectory, GuardianDirectoryError};
use crate::domain::{Guardian, GuardianId};

use super::diesel_basic_error_mapping::{map_corrupt_row, map_diesel_error, map_pool_error};
use super::models::GuardianRow;
use super::pool::DbPool;
use super::schema::guardians;

/// Diesel implementation of [`GuardianDirectory`].
#[derive(Clone)]
pub struct DieselGuardianDirectory {
    pool: DbPool,
}

impl DieselGuardianDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuardianDirectory for DieselGuardianDirectory {
    async fn find_by_id(
        &self,
        guardian_id: &GuardianId,
    ) -> Result<Option<Guardian>, GuardianDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<GuardianRow> = guardians::table
            .find(*guardian_id.as_uuid())
            .select(GuardianRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Guardian::try_from)
            .transpose()
            .map_err(map_corrupt_row)
    }
}
