//! Port for the append-only notification log.

use async_trait::async_trait;

use crate::domain::{ChildId, DoseRecordId, NotificationLogEntry};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification log adapters.
    pub enum NotificationLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification log connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "notification log query failed: {message}",
    }
}

/// Append-only store of reminder attempts.
///
/// Entries are never updated or deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationLogRepository: Send + Sync {
    /// Append one entry.
    async fn append(
        &self,
        entry: &NotificationLogEntry,
    ) -> Result<(), NotificationLogRepositoryError>;

    /// Entries for a child, newest first.
    async fn list_for_child(
        &self,
        child_id: &ChildId,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogRepositoryError>;

    /// Entries for a dose, newest first.
    async fn list_for_dose(
        &self,
        dose_id: &DoseRecordId,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogRepositoryError>;
}

/// Fixture log that accepts and forgets every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationLogRepository;

#[async_trait]
impl NotificationLogRepository for FixtureNotificationLogRepository {
    async fn append(
        &self,
        _entry: &NotificationLogEntry,
    ) -> Result<(), NotificationLogRepositoryError> {
        Ok(())
    }

    async fn list_for_child(
        &self,
        _child_id: &ChildId,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_dose(
        &self,
        _dose_id: &DoseRecordId,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_history_is_always_empty() {
        let log = FixtureNotificationLogRepository;
        let child = log
            .list_for_child(&ChildId::random())
            .await
            .expect("fixture listing succeeds");
        let dose = log
            .list_for_dose(&DoseRecordId::random())
            .await
            .expect("fixture listing succeeds");
        assert!(child.is_empty() && dose.is_empty());
    }
}
