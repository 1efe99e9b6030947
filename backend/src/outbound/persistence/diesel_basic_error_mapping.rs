//! Shared Diesel error mapping for the repository adapters.
//!
//! Every repository port in this crate exposes the same two failure
//! categories, so one generic mapping serves them all.

use tracing::debug;

use crate::domain::ports::{
    ChildRepositoryError, DoseRecordRepositoryError, GuardianDirectoryError,
    NotificationLogRepositoryError,
};

use super::models::CorruptRow;
use super::pool::PoolError;

/// Port errors with a connection and a query category.
pub(crate) trait BasicRepositoryError: Sized {
    fn connection_failure(message: String) -> Self;
    fn query_failure(message: String) -> Self;
}

macro_rules! impl_basic_repository_error {
    ($($error:ty),+ $(,)?) => {
        $(
            impl BasicRepositoryError for $error {
                fn connection_failure(message: String) -> Self {
                    Self::connection(message)
                }

                fn query_failure(message: String) -> Self {
                    Self::query(message)
                }
            }
        )+
    };
}

impl_basic_repository_error!(
    ChildRepositoryError,
    DoseRecordRepositoryError,
    GuardianDirectoryError,
    NotificationLogRepositoryError,
);

/// Map pool errors to the port's connection variant.
pub(crate) fn map_pool_error<E: BasicRepositoryError>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection_failure(message)
}

/// Map Diesel errors to the port's connection or query variant.
///
/// Database detail is logged at `debug` and replaced with a generic message
/// so SQL text never reaches callers.
pub(crate) fn map_diesel_error<E: BasicRepositoryError>(error: diesel::result::Error) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => E::query_failure("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query_failure("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::DatabaseError(DatabaseErrorKind::UnableToSendCommand, _)
        | DieselError::BrokenTransactionManager => {
            E::connection_failure("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            E::query_failure("duplicate record".to_owned())
        }
        _ => E::query_failure("database error".to_owned()),
    }
}

/// Report a stored row the domain rejects as a query failure.
pub(crate) fn map_corrupt_row<E: BasicRepositoryError>(error: CorruptRow) -> E {
    debug!(table = error.table, id = %error.id, reason = %error.reason, "corrupt row");
    E::query_failure(error.to_string())
}
