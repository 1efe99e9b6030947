//! Response payloads shared by the HTTP handlers.
//!
//! Domain types keep their invariants behind accessors; these flat DTOs are
//! what clients see. Identifiers are rendered as UUID strings, calendar dates
//! as `YYYY-MM-DD` and instants as RFC 3339.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    BloodGroup, Child, DoseRecord, DoseStatus, Gender, NotificationChannel,
    NotificationLogEntry, NotificationStatus,
};

/// An enrolled child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub guardian_id: String,
    #[schema(example = "Meera")]
    pub name: String,
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub medical_history: String,
}

impl From<&Child> for ChildResponse {
    fn from(child: &Child) -> Self {
        Self {
            id: child.id().to_string(),
            guardian_id: child.guardian_id().to_string(),
            name: child.name().to_owned(),
            date_of_birth: child.date_of_birth(),
            gender: child.gender(),
            blood_group: child.blood_group(),
            medical_history: child.medical_history().to_owned(),
        }
    }
}

/// One scheduled dose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoseRecordResponse {
    pub id: String,
    pub child_id: String,
    #[schema(example = "OPV-1")]
    pub vaccine_name: String,
    pub description: String,
    #[schema(value_type = String, format = Date, example = "2024-02-12")]
    pub due_date: NaiveDate,
    pub status: DoseStatus,
    #[schema(value_type = Option<String>, format = Date)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&DoseRecord> for DoseRecordResponse {
    fn from(dose: &DoseRecord) -> Self {
        Self {
            id: dose.id().to_string(),
            child_id: dose.child_id().to_string(),
            vaccine_name: dose.vaccine_name().to_owned(),
            description: dose.description().to_owned(),
            due_date: dose.due_date(),
            status: dose.status(),
            completion_date: dose.completion_date(),
            notes: dose.notes().map(str::to_owned),
        }
    }
}

/// A child together with its dose schedule, earliest due first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildDetailResponse {
    pub child: ChildResponse,
    pub schedule: Vec<DoseRecordResponse>,
}

impl ChildDetailResponse {
    pub fn new(child: &Child, schedule: &[DoseRecord]) -> Self {
        Self {
            child: ChildResponse::from(child),
            schedule: schedule.iter().map(DoseRecordResponse::from).collect(),
        }
    }
}

/// One reminder delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLogEntryResponse {
    pub id: String,
    pub child_id: String,
    pub dose_record_id: String,
    pub channel: NotificationChannel,
    pub message: String,
    pub status: NotificationStatus,
    #[schema(value_type = String, format = DateTime)]
    pub sent_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&NotificationLogEntry> for NotificationLogEntryResponse {
    fn from(entry: &NotificationLogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            child_id: entry.child_id.to_string(),
            dose_record_id: entry.dose_record_id.to_string(),
            channel: entry.channel,
            message: entry.message.clone(),
            status: entry.status,
            sent_at: entry.sent_at,
            error: entry.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{ChildId, DoseRecordId};

    #[rstest]
    fn notification_entries_serialise_in_camel_case() {
        let sent_at = Utc
            .with_ymd_and_hms(2024, 2, 11, 9, 0, 0)
            .single()
            .expect("valid time");
        let entry = NotificationLogEntry::failed(
            ChildId::random(),
            DoseRecordId::random(),
            "Reminder: Meera is due for OPV-1 vaccination tomorrow (12 Feb 2024).",
            sent_at,
            "relay rejected",
        );

        let value: Value =
            serde_json::to_value(NotificationLogEntryResponse::from(&entry)).expect("json");

        assert_eq!(value["channel"], json!("Email"));
        assert_eq!(value["status"], json!("Failed"));
        assert_eq!(value["sentAt"], json!("2024-02-11T09:00:00Z"));
        assert_eq!(value["error"], json!("relay rejected"));
        assert_eq!(value["doseRecordId"], json!(entry.dose_record_id.to_string()));
    }
}
