//! Scheduled doses and their status lifecycle.
//!
//! A dose record is created `Pending` when a child is enrolled. Afterwards
//! only its status, completion date and notes change; the due date is fixed at
//! creation and never recomputed.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::{ChildId, DoseRecordId};

/// Validation errors raised for dose records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DoseRecordValidationError {
    /// The status label was not recognised.
    #[error("status must be one of Pending, Completed, Missed, Skipped")]
    UnknownStatus,
    /// A stored record has a completion date without being completed, or the
    /// reverse.
    #[error("completion date must be present exactly when the dose is completed")]
    CompletionDateMismatch,
    /// A stored record has a blank vaccine name.
    #[error("vaccine name must not be blank")]
    BlankVaccineName,
}

/// Lifecycle state of one dose.
///
/// `Pending` is always the creation state. Every other state is entered only
/// through [`DoseRecord::set_status`]; nothing moves an overdue dose to
/// `Missed` automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum DoseStatus {
    /// Due or upcoming; eligible for reminders.
    Pending,
    /// Administered; carries a completion date.
    Completed,
    /// Recorded as missed.
    Missed,
    /// Deliberately skipped.
    Skipped,
}

impl DoseStatus {
    /// Stable label used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Missed => "Missed",
            Self::Skipped => "Skipped",
        }
    }
}

impl fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoseStatus {
    type Err = DoseRecordValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Missed" => Ok(Self::Missed),
            "Skipped" => Ok(Self::Skipped),
            _ => Err(DoseRecordValidationError::UnknownStatus),
        }
    }
}

/// Stored attributes of a dose, used to rebuild the entity from persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseRecordSnapshot {
    pub id: DoseRecordId,
    pub child_id: ChildId,
    pub vaccine_name: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub status: DoseStatus,
    pub completion_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// One scheduled administration of a vaccine for one child.
///
/// ## Invariants
/// - `completion_date` is present if and only if `status` is `Completed`.
/// - `due_date` is immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseRecord {
    id: DoseRecordId,
    child_id: ChildId,
    vaccine_name: String,
    description: String,
    due_date: NaiveDate,
    status: DoseStatus,
    completion_date: Option<NaiveDate>,
    notes: Option<String>,
}

impl DoseRecord {
    /// A freshly scheduled, pending dose.
    pub fn scheduled(
        id: DoseRecordId,
        child_id: ChildId,
        vaccine_name: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            child_id,
            vaccine_name: vaccine_name.into(),
            description: description.into(),
            due_date,
            status: DoseStatus::Pending,
            completion_date: None,
            notes: None,
        }
    }

    /// Rebuild a dose from stored attributes, checking the completion-date
    /// invariant.
    pub fn restore(snapshot: DoseRecordSnapshot) -> Result<Self, DoseRecordValidationError> {
        if snapshot.vaccine_name.trim().is_empty() {
            return Err(DoseRecordValidationError::BlankVaccineName);
        }
        let completed = snapshot.status == DoseStatus::Completed;
        if completed != snapshot.completion_date.is_some() {
            return Err(DoseRecordValidationError::CompletionDateMismatch);
        }
        Ok(Self {
            id: snapshot.id,
            child_id: snapshot.child_id,
            vaccine_name: snapshot.vaccine_name,
            description: snapshot.description,
            due_date: snapshot.due_date,
            status: snapshot.status,
            completion_date: snapshot.completion_date,
            notes: snapshot.notes,
        })
    }

    /// Move the dose to `status`.
    ///
    /// Entering `Completed` stamps `today`; a dose that is already completed
    /// keeps its original stamp. Any other status clears the stamp.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use immunisation::domain::{ChildId, DoseRecord, DoseRecordId, DoseStatus};
    ///
    /// let due = NaiveDate::from_ymd_opt(2024, 2, 12).expect("valid date");
    /// let mut dose = DoseRecord::scheduled(DoseRecordId::random(), ChildId::random(), "OPV 1", "Polio", due);
    /// dose.set_status(DoseStatus::Completed, due);
    /// assert_eq!(dose.completion_date(), Some(due));
    /// dose.set_status(DoseStatus::Pending, due);
    /// assert_eq!(dose.completion_date(), None);
    /// ```
    pub fn set_status(&mut self, status: DoseStatus, today: NaiveDate) {
        self.completion_date = match (status, self.completion_date) {
            (DoseStatus::Completed, Some(first)) => Some(first),
            (DoseStatus::Completed, None) => Some(today),
            (DoseStatus::Pending | DoseStatus::Missed | DoseStatus::Skipped, _) => None,
        };
        self.status = status;
    }

    /// Replace the free-text notes; an empty string clears them.
    pub fn set_notes(&mut self, notes: String) {
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
    }

    /// Stable identifier, assigned at scheduling time.
    pub fn id(&self) -> DoseRecordId {
        self.id
    }

    /// Owning child.
    pub fn child_id(&self) -> ChildId {
        self.child_id
    }

    /// Catalogue name, e.g. `OPV 1`.
    pub fn vaccine_name(&self) -> &str {
        self.vaccine_name.as_str()
    }

    /// Catalogue description shown alongside the name.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Calendar date the dose falls due.
    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Current lifecycle status.
    pub fn status(&self) -> DoseStatus {
        self.status
    }

    /// Date the dose was marked completed, in the reference zone.
    pub fn completion_date(&self) -> Option<NaiveDate> {
        self.completion_date
    }

    /// Free-text notes, if any were recorded.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the dose status lifecycle.

    use rstest::{fixture, rstest};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[fixture]
    fn dose() -> DoseRecord {
        DoseRecord::scheduled(
            DoseRecordId::random(),
            ChildId::random(),
            "Pentavalent 1",
            "Diphtheria, Pertussis, Tetanus, Hepatitis B, Hib",
            date(2024, 2, 12),
        )
    }

    #[rstest]
    fn scheduled_doses_start_pending(dose: DoseRecord) {
        assert_eq!(dose.status(), DoseStatus::Pending);
        assert_eq!(dose.completion_date(), None);
        assert_eq!(dose.notes(), None);
    }

    #[rstest]
    fn repeated_completion_keeps_first_stamp(mut dose: DoseRecord) {
        dose.set_status(DoseStatus::Completed, date(2024, 2, 12));
        dose.set_status(DoseStatus::Completed, date(2024, 2, 20));
        assert_eq!(dose.status(), DoseStatus::Completed);
        assert_eq!(dose.completion_date(), Some(date(2024, 2, 12)));
    }

    #[rstest]
    #[case(DoseStatus::Pending)]
    #[case(DoseStatus::Missed)]
    #[case(DoseStatus::Skipped)]
    fn leaving_completed_clears_the_stamp(mut dose: DoseRecord, #[case] next: DoseStatus) {
        dose.set_status(DoseStatus::Completed, date(2024, 2, 12));
        dose.set_status(next, date(2024, 2, 13));
        assert_eq!(dose.status(), next);
        assert_eq!(dose.completion_date(), None);
    }

    #[rstest]
    fn recompleting_after_reversal_restamps(mut dose: DoseRecord) {
        dose.set_status(DoseStatus::Completed, date(2024, 2, 12));
        dose.set_status(DoseStatus::Pending, date(2024, 2, 13));
        dose.set_status(DoseStatus::Completed, date(2024, 2, 14));
        assert_eq!(dose.completion_date(), Some(date(2024, 2, 14)));
    }

    #[rstest]
    fn blank_notes_clear_existing_notes(mut dose: DoseRecord) {
        dose.set_notes("given at clinic".to_owned());
        assert_eq!(dose.notes(), Some("given at clinic"));
        dose.set_notes("  ".to_owned());
        assert_eq!(dose.notes(), None);
    }

    #[rstest]
    #[case(DoseStatus::Completed, None)]
    #[case(DoseStatus::Pending, Some(date(2024, 2, 12)))]
    fn restore_rejects_completion_mismatch(
        dose: DoseRecord,
        #[case] status: DoseStatus,
        #[case] completion_date: Option<NaiveDate>,
    ) {
        let snapshot = DoseRecordSnapshot {
            id: dose.id(),
            child_id: dose.child_id(),
            vaccine_name: dose.vaccine_name().to_owned(),
            description: dose.description().to_owned(),
            due_date: dose.due_date(),
            status,
            completion_date,
            notes: None,
        };
        assert_eq!(
            DoseRecord::restore(snapshot),
            Err(DoseRecordValidationError::CompletionDateMismatch)
        );
    }

    #[rstest]
    fn status_labels_parse_back() {
        for status in [
            DoseStatus::Pending,
            DoseStatus::Completed,
            DoseStatus::Missed,
            DoseStatus::Skipped,
        ] {
            assert_eq!(status.as_str().parse::<DoseStatus>(), Ok(status));
        }
        assert_eq!(
            "Done".parse::<DoseStatus>(),
            Err(DoseRecordValidationError::UnknownStatus)
        );
    }
}
