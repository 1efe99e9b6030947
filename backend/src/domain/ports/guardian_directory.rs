//! Port for resolving guardian accounts owned by the identity service.

use async_trait::async_trait;

use crate::domain::{Guardian, GuardianId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by guardian directory adapters.
    pub enum GuardianDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "guardian directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "guardian directory query failed: {message}",
    }
}

/// Read-only lookup of guardian accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuardianDirectory: Send + Sync {
    /// Find a guardian by id.
    async fn find_by_id(
        &self,
        guardian_id: &GuardianId,
    ) -> Result<Option<Guardian>, GuardianDirectoryError>;
}

/// Fixture directory that knows no guardians.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGuardianDirectory;

#[async_trait]
impl GuardianDirectory for FixtureGuardianDirectory {
    async fn find_by_id(
        &self,
        _guardian_id: &GuardianId,
    ) -> Result<Option<Guardian>, GuardianDirectoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_knows_no_guardians() {
        let found = FixtureGuardianDirectory
            .find_by_id(&GuardianId::random())
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = GuardianDirectoryError::query("timeout");
        assert_eq!(err.to_string(), "guardian directory query failed: timeout");
    }
}
