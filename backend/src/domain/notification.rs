//! Notification log entries: the audit trail of reminder attempts.
//!
//! Entries are historical facts. They are written once with the resolved
//! outcome of a delivery attempt and never updated or deleted, even when the
//! child they refer to is later removed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::{ChildId, DoseRecordId, NotificationLogEntryId};

/// Validation errors raised for log entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationValidationError {
    /// The channel label was not recognised.
    #[error("channel must be one of Email, SMS, App")]
    UnknownChannel,
    /// The status label was not recognised.
    #[error("notification status must be one of Sent, Failed, Pending")]
    UnknownStatus,
}

/// Medium a reminder was sent through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum NotificationChannel {
    Email,
    #[serde(rename = "SMS")]
    Sms,
    App,
}

impl NotificationChannel {
    /// Stable label used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Sms => "SMS",
            Self::App => "App",
        }
    }
}

impl FromStr for NotificationChannel {
    type Err = NotificationValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Email" => Ok(Self::Email),
            "SMS" => Ok(Self::Sms),
            "App" => Ok(Self::App),
            _ => Err(NotificationValidationError::UnknownChannel),
        }
    }
}

/// Outcome of a delivery attempt.
///
/// The reminder scan only ever writes `Sent` or `Failed`; `Pending` exists
/// for entries produced by other collaborators that resolve asynchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum NotificationStatus {
    Sent,
    Failed,
    Pending,
}

impl NotificationStatus {
    /// Stable label used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "Sent",
            Self::Failed => "Failed",
            Self::Pending => "Pending",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationStatus {
    type Err = NotificationValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Sent" => Ok(Self::Sent),
            "Failed" => Ok(Self::Failed),
            "Pending" => Ok(Self::Pending),
            _ => Err(NotificationValidationError::UnknownStatus),
        }
    }
}

/// One recorded reminder attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationLogEntry {
    pub id: NotificationLogEntryId,
    pub child_id: ChildId,
    pub dose_record_id: DoseRecordId,
    pub channel: NotificationChannel,
    pub message: String,
    pub status: NotificationStatus,
    pub sent_at: DateTime<Utc>,
    /// Failure detail; present only for `Failed` entries written by the scan.
    pub error: Option<String>,
}

impl NotificationLogEntry {
    /// Entry for a successful e-mail reminder.
    pub fn sent(
        child_id: ChildId,
        dose_record_id: DoseRecordId,
        message: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationLogEntryId::random(),
            child_id,
            dose_record_id,
            channel: NotificationChannel::Email,
            message: message.into(),
            status: NotificationStatus::Sent,
            sent_at,
            error: None,
        }
    }

    /// Entry for a failed e-mail reminder.
    pub fn failed(
        child_id: ChildId,
        dose_record_id: DoseRecordId,
        message: impl Into<String>,
        sent_at: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            status: NotificationStatus::Failed,
            error: Some(error.into()),
            ..Self::sent(child_id, dose_record_id, message, sent_at)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for log entry construction.

    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn failed_entries_carry_the_error() {
        let at = Utc
            .with_ymd_and_hms(2024, 2, 11, 9, 0, 0)
            .single()
            .expect("valid time");
        let entry = NotificationLogEntry::failed(
            ChildId::random(),
            DoseRecordId::random(),
            "Reminder",
            at,
            "relay rejected",
        );
        assert_eq!(entry.status, NotificationStatus::Failed);
        assert_eq!(entry.channel, NotificationChannel::Email);
        assert_eq!(entry.error.as_deref(), Some("relay rejected"));
        assert_eq!(entry.sent_at, at);
    }

    #[rstest]
    #[case(NotificationChannel::Sms, "SMS")]
    #[case(NotificationChannel::Email, "Email")]
    fn channel_labels_match_wire_names(#[case] channel: NotificationChannel, #[case] raw: &str) {
        assert_eq!(channel.as_str(), raw);
        assert_eq!(raw.parse::<NotificationChannel>(), Ok(channel));
        let json = serde_json::to_value(channel).expect("serialise channel");
        assert_eq!(json, serde_json::Value::String(raw.to_owned()));
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        assert_eq!(
            "Queued".parse::<NotificationStatus>(),
            Err(NotificationValidationError::UnknownStatus)
        );
    }
}
