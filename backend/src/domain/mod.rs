//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed immunisation model (children, dose
//! records, guardians, notification log entries), the services that act on
//! it, and the ports adapters implement. Nothing here knows about HTTP or
//! SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Child, DoseRecord, Guardian, NotificationLogEntry: entities.
//! - VaccineCatalogue and `generate_schedule`: schedule derivation.
//! - ChildEnrolmentService, DoseLifecycleService, NotificationAuditService:
//!   driving-port implementations.
//! - ReminderScanner and DailyScheduler: the background reminder job.

pub mod child;
pub mod daily_scheduler;
pub mod dose_lifecycle_service;
pub mod dose_record;
pub mod enrolment_service;
pub mod error;
pub mod guardian;
pub mod identifiers;
pub mod notification;
pub mod notification_audit_service;
mod ownership;
pub mod ports;
pub mod reference_zone;
pub mod reminder_scanner;
pub mod schedule_generator;
pub mod vaccine_catalogue;

pub use self::child::{
    BloodGroup, CHILD_NAME_MAX, Child, ChildDraft, ChildProfileUpdate, ChildRecord,
    ChildValidationError, Gender,
};
pub use self::daily_scheduler::{
    DailySchedule, DailyScheduler, ScheduledJob, SchedulerError, SchedulerHandle,
};
pub use self::dose_lifecycle_service::DoseLifecycleService;
pub use self::dose_record::{
    DoseRecord, DoseRecordSnapshot, DoseRecordValidationError, DoseStatus,
};
pub use self::enrolment_service::ChildEnrolmentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::guardian::{EmailAddress, Guardian, GuardianKind, GuardianValidationError};
pub use self::identifiers::{
    ChildId, DoseRecordId, GuardianId, IdentifierParseError, NotificationLogEntryId,
};
pub use self::notification::{
    NotificationChannel, NotificationLogEntry, NotificationStatus, NotificationValidationError,
};
pub use self::notification_audit_service::NotificationAuditService;
pub use self::reference_zone::ReferenceZone;
pub use self::reminder_scanner::{
    REMINDER_SUBJECT, ReminderDedupePolicy, ReminderDisposition, ReminderOutcome,
    ReminderScanner, ReminderScannerConfig, ReminderScannerPorts, ScanReport, ScanWindow,
    SkipReason, reminder_body,
};
pub use self::schedule_generator::{ScheduleGenerationError, generate_schedule};
pub use self::vaccine_catalogue::{
    CatalogueValidationError, VaccineCatalogue, VaccineCatalogueEntry,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use immunisation::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("not your child"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
