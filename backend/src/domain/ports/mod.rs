//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, directory, delivery) are implemented by
//! outbound adapters; driving ports (enrolment, dose status, audit) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod child_enrolment;
mod child_repository;
mod delivery_channel;
mod dose_record_repository;
mod dose_status_command;
mod guardian_directory;
mod notification_audit_query;
mod notification_log_repository;

#[cfg(test)]
pub use child_enrolment::MockChildEnrolment;
pub use child_enrolment::ChildEnrolment;
#[cfg(test)]
pub use child_repository::MockChildRepository;
pub use child_repository::{ChildRepository, ChildRepositoryError, FixtureChildRepository};
#[cfg(test)]
pub use delivery_channel::MockDeliveryChannel;
pub use delivery_channel::{DeliveryChannel, DeliveryError, DeliveryReceipt, OutboundMessage};
#[cfg(test)]
pub use dose_record_repository::MockDoseRecordRepository;
pub use dose_record_repository::{
    DoseRecordRepository, DoseRecordRepositoryError, FixtureDoseRecordRepository,
};
#[cfg(test)]
pub use dose_status_command::MockDoseStatusCommand;
pub use dose_status_command::{DoseStatusCommand, SetDoseStatusRequest};
#[cfg(test)]
pub use guardian_directory::MockGuardianDirectory;
pub use guardian_directory::{FixtureGuardianDirectory, GuardianDirectory, GuardianDirectoryError};
#[cfg(test)]
pub use notification_audit_query::MockNotificationAuditQuery;
pub use notification_audit_query::NotificationAuditQuery;
#[cfg(test)]
pub use notification_log_repository::MockNotificationLogRepository;
pub use notification_log_repository::{
    FixtureNotificationLogRepository, NotificationLogRepository, NotificationLogRepositoryError,
};
