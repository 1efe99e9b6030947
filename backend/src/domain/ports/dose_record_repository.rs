//! Port for dose record reads and single-record status writes.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{ChildId, DoseRecord, DoseRecordId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by dose record repository adapters.
    pub enum DoseRecordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "dose record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "dose record repository query failed: {message}",
    }
}

/// Port for dose records.
///
/// Dose records are created and deleted only together with their child (see
/// `ChildRepository`); this port never inserts or removes rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoseRecordRepository: Send + Sync {
    /// Every dose scheduled for a child, in no particular order.
    async fn list_for_child(
        &self,
        child_id: &ChildId,
    ) -> Result<Vec<DoseRecord>, DoseRecordRepositoryError>;

    /// Find a dose by id.
    async fn find_by_id(
        &self,
        dose_id: &DoseRecordId,
    ) -> Result<Option<DoseRecord>, DoseRecordRepositoryError>;

    /// Persist the status, completion date and notes of an existing dose.
    ///
    /// Returns `false` when the dose no longer exists.
    async fn save_status(&self, dose: &DoseRecord) -> Result<bool, DoseRecordRepositoryError>;

    /// Pending doses whose due date is exactly `due_date`.
    async fn list_pending_due_on(
        &self,
        due_date: NaiveDate,
    ) -> Result<Vec<DoseRecord>, DoseRecordRepositoryError>;
}

/// Fixture implementation for tests that do not exercise dose persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDoseRecordRepository;

#[async_trait]
impl DoseRecordRepository for FixtureDoseRecordRepository {
    async fn list_for_child(
        &self,
        _child_id: &ChildId,
    ) -> Result<Vec<DoseRecord>, DoseRecordRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _dose_id: &DoseRecordId,
    ) -> Result<Option<DoseRecord>, DoseRecordRepositoryError> {
        Ok(None)
    }

    async fn save_status(&self, _dose: &DoseRecord) -> Result<bool, DoseRecordRepositoryError> {
        Ok(false)
    }

    async fn list_pending_due_on(
        &self,
        _due_date: NaiveDate,
    ) -> Result<Vec<DoseRecord>, DoseRecordRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_scan_query_returns_empty() {
        let repo = FixtureDoseRecordRepository;
        let due = NaiveDate::from_ymd_opt(2024, 2, 12).expect("valid date");
        let listed = repo
            .list_pending_due_on(due)
            .await
            .expect("fixture list succeeds");
        assert!(listed.is_empty());
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = DoseRecordRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
        assert_eq!(err.kind(), "query");
    }
}
