//! Shared ownership checks and repository error mapping for the driving
//! services.

use crate::domain::ports::{
    ChildRepository, ChildRepositoryError, DoseRecordRepositoryError,
    NotificationLogRepositoryError,
};
use crate::domain::{Child, ChildId, Error, GuardianId};

pub(crate) fn map_child_repository_error(error: ChildRepositoryError) -> Error {
    match error {
        ChildRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("child repository unavailable: {message}"))
        }
        ChildRepositoryError::Query { message } => {
            Error::internal(format!("child repository error: {message}"))
        }
    }
}

pub(crate) fn map_dose_repository_error(error: DoseRecordRepositoryError) -> Error {
    match error {
        DoseRecordRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("dose record repository unavailable: {message}"))
        }
        DoseRecordRepositoryError::Query { message } => {
            Error::internal(format!("dose record repository error: {message}"))
        }
    }
}

pub(crate) fn map_notification_log_error(error: NotificationLogRepositoryError) -> Error {
    match error {
        NotificationLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification log unavailable: {message}"))
        }
        NotificationLogRepositoryError::Query { message } => {
            Error::internal(format!("notification log error: {message}"))
        }
    }
}

/// Load a child and confirm `requested_by` owns it.
///
/// A missing child is `NotFound`; a child owned by another guardian is
/// `Forbidden`.
pub(crate) async fn load_owned_child<C>(
    children: &C,
    child_id: ChildId,
    requested_by: GuardianId,
) -> Result<Child, Error>
where
    C: ChildRepository + ?Sized,
{
    let child = children
        .find_by_id(&child_id)
        .await
        .map_err(map_child_repository_error)?
        .ok_or_else(|| Error::not_found(format!("child {child_id} not found")))?;

    if !child.is_owned_by(requested_by) {
        return Err(Error::forbidden(format!(
            "child {child_id} belongs to another guardian"
        )));
    }
    Ok(child)
}
