//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types validate
//! stored enumerations and report corrupt rows as query errors.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Child, ChildId, ChildRecord, DoseRecord, DoseRecordId, DoseRecordSnapshot, EmailAddress,
    Guardian, GuardianId, NotificationLogEntry, NotificationLogEntryId,
};

use super::schema::{children, dose_records, guardians, notification_log};

/// Describes why a stored row could not be turned into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupt {table} row {id}: {reason}")]
pub(crate) struct CorruptRow {
    pub table: &'static str,
    pub id: Uuid,
    pub reason: String,
}

impl CorruptRow {
    fn new(table: &'static str, id: Uuid, reason: impl ToString) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Guardians
// ---------------------------------------------------------------------------

/// Row struct for reading from the guardians table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = guardians)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GuardianRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub kind: String,
}

impl TryFrom<GuardianRow> for Guardian {
    type Error = CorruptRow;

    fn try_from(row: GuardianRow) -> Result<Self, Self::Error> {
        let email =
            EmailAddress::new(row.email).map_err(|err| CorruptRow::new("guardians", row.id, err))?;
        let kind = row
            .kind
            .parse()
            .map_err(|err| CorruptRow::new("guardians", row.id, err))?;
        Ok(Guardian::new(
            GuardianId::from_uuid(row.id),
            row.display_name,
            email,
            kind,
        ))
    }
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

/// Row struct for reading from the children table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = children)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChildRow {
    pub id: Uuid,
    pub guardian_id: Uuid,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub blood_group: String,
    pub medical_history: String,
}

impl TryFrom<ChildRow> for Child {
    type Error = CorruptRow;

    fn try_from(row: ChildRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |err: &dyn std::fmt::Display| CorruptRow::new("children", id, err);
        let gender = row.gender.parse().map_err(|err| corrupt(&err))?;
        let blood_group = row.blood_group.parse().map_err(|err| corrupt(&err))?;
        Child::restore(ChildRecord {
            id: ChildId::from_uuid(row.id),
            guardian_id: GuardianId::from_uuid(row.guardian_id),
            name: row.name,
            date_of_birth: row.date_of_birth,
            gender,
            blood_group,
            medical_history: row.medical_history,
        })
        .map_err(|err| corrupt(&err))
    }
}

/// Insertable struct for enrolling a child.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = children)]
pub(crate) struct NewChildRow<'a> {
    pub id: Uuid,
    pub guardian_id: Uuid,
    pub name: &'a str,
    pub date_of_birth: NaiveDate,
    pub gender: &'a str,
    pub blood_group: &'a str,
    pub medical_history: &'a str,
}

impl<'a> From<&'a Child> for NewChildRow<'a> {
    fn from(child: &'a Child) -> Self {
        Self {
            id: *child.id().as_uuid(),
            guardian_id: *child.guardian_id().as_uuid(),
            name: child.name(),
            date_of_birth: child.date_of_birth(),
            gender: child.gender().as_str(),
            blood_group: child.blood_group().as_str(),
            medical_history: child.medical_history(),
        }
    }
}

/// Changeset for the mutable profile fields. The date of birth is absent on
/// purpose.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = children)]
pub(crate) struct ChildProfileChangeset<'a> {
    pub name: &'a str,
    pub gender: &'a str,
    pub blood_group: &'a str,
    pub medical_history: &'a str,
}

impl<'a> From<&'a Child> for ChildProfileChangeset<'a> {
    fn from(child: &'a Child) -> Self {
        Self {
            name: child.name(),
            gender: child.gender().as_str(),
            blood_group: child.blood_group().as_str(),
            medical_history: child.medical_history(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dose records
// ---------------------------------------------------------------------------

/// Row struct for reading from the dose_records table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dose_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DoseRecordRow {
    pub id: Uuid,
    pub child_id: Uuid,
    pub vaccine_name: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub status: String,
    pub completion_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl TryFrom<DoseRecordRow> for DoseRecord {
    type Error = CorruptRow;

    fn try_from(row: DoseRecordRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let status = row
            .status
            .parse()
            .map_err(|err| CorruptRow::new("dose_records", id, err))?;
        DoseRecord::restore(DoseRecordSnapshot {
            id: DoseRecordId::from_uuid(row.id),
            child_id: ChildId::from_uuid(row.child_id),
            vaccine_name: row.vaccine_name,
            description: row.description,
            due_date: row.due_date,
            status,
            completion_date: row.completion_date,
            notes: row.notes,
        })
        .map_err(|err| CorruptRow::new("dose_records", id, err))
    }
}

/// Insertable struct for scheduled doses.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dose_records)]
pub(crate) struct NewDoseRecordRow<'a> {
    pub id: Uuid,
    pub child_id: Uuid,
    pub vaccine_name: &'a str,
    pub description: &'a str,
    pub due_date: NaiveDate,
    pub status: &'a str,
    pub completion_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a DoseRecord> for NewDoseRecordRow<'a> {
    fn from(dose: &'a DoseRecord) -> Self {
        Self {
            id: *dose.id().as_uuid(),
            child_id: *dose.child_id().as_uuid(),
            vaccine_name: dose.vaccine_name(),
            description: dose.description(),
            due_date: dose.due_date(),
            status: dose.status().as_str(),
            completion_date: dose.completion_date(),
            notes: dose.notes(),
        }
    }
}

/// Changeset for status transitions. `treat_none_as_null` so clearing a
/// completion date or note reaches the database.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = dose_records)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DoseStatusChangeset<'a> {
    pub status: &'a str,
    pub completion_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a DoseRecord> for DoseStatusChangeset<'a> {
    fn from(dose: &'a DoseRecord) -> Self {
        Self {
            status: dose.status().as_str(),
            completion_date: dose.completion_date(),
            notes: dose.notes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Notification log
// ---------------------------------------------------------------------------

/// Row struct for reading from the notification_log table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notification_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationLogRow {
    pub id: Uuid,
    pub child_id: Uuid,
    pub dose_record_id: Uuid,
    pub channel: String,
    pub message: String,
    pub status: String,
    pub sent_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl TryFrom<NotificationLogRow> for NotificationLogEntry {
    type Error = CorruptRow;

    fn try_from(row: NotificationLogRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |err: &dyn std::fmt::Display| CorruptRow::new("notification_log", id, err);
        Ok(NotificationLogEntry {
            id: NotificationLogEntryId::from_uuid(row.id),
            child_id: ChildId::from_uuid(row.child_id),
            dose_record_id: DoseRecordId::from_uuid(row.dose_record_id),
            channel: row.channel.parse().map_err(|err| corrupt(&err))?,
            message: row.message,
            status: row.status.parse().map_err(|err| corrupt(&err))?,
            sent_at: row.sent_at,
            error: row.error,
        })
    }
}

/// Insertable struct for appending log entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notification_log)]
pub(crate) struct NewNotificationLogRow<'a> {
    pub id: Uuid,
    pub child_id: Uuid,
    pub dose_record_id: Uuid,
    pub channel: &'a str,
    pub message: &'a str,
    pub status: &'a str,
    pub sent_at: DateTime<Utc>,
    pub error: Option<&'a str>,
}

impl<'a> From<&'a NotificationLogEntry> for NewNotificationLogRow<'a> {
    fn from(entry: &'a NotificationLogEntry) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            child_id: *entry.child_id.as_uuid(),
            dose_record_id: *entry.dose_record_id.as_uuid(),
            channel: entry.channel.as_str(),
            message: entry.message.as_str(),
            status: entry.status.as_str(),
            sent_at: entry.sent_at,
            error: entry.error.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversions.

    use rstest::rstest;

    use super::*;
    use crate::domain::{DoseStatus, Gender};

    fn child_row() -> ChildRow {
        ChildRow {
            id: Uuid::new_v4(),
            guardian_id: Uuid::new_v4(),
            name: "Asha".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            gender: "Female".to_owned(),
            blood_group: "O+".to_owned(),
            medical_history: String::new(),
        }
    }

    #[rstest]
    fn child_row_converts_to_domain() {
        let child = Child::try_from(child_row()).expect("valid row");
        assert_eq!(child.gender(), Gender::Female);
        assert_eq!(child.blood_group().as_str(), "O+");
    }

    #[rstest]
    fn unknown_gender_is_reported_as_corrupt() {
        let row = ChildRow {
            gender: "robot".to_owned(),
            ..child_row()
        };
        let err = Child::try_from(row).expect_err("corrupt row");
        assert_eq!(err.table, "children");
    }

    #[rstest]
    fn completed_dose_without_date_is_corrupt() {
        let row = DoseRecordRow {
            id: Uuid::new_v4(),
            child_id: Uuid::new_v4(),
            vaccine_name: "BCG".to_owned(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            status: DoseStatus::Completed.as_str().to_owned(),
            completion_date: None,
            notes: None,
        };
        assert!(DoseRecord::try_from(row).is_err());
    }
}
