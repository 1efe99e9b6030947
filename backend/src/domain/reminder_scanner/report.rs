//! Scan results: per-record outcomes and run totals.

use crate::domain::{ChildId, DoseRecordId, NotificationStatus};

use super::ScanWindow;

/// Why a qualifying dose received no reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The dose references a child that no longer exists.
    ChildMissing,
    /// The child's guardian could not be found.
    GuardianMissing,
    /// A prior reminder for this dose was already sent.
    AlreadyReminded,
    /// Child, guardian or log lookup failed.
    LookupFailed(String),
}

/// What happened to one qualifying dose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderDisposition {
    /// Delivered (or simulated) and logged as `Sent`.
    Sent,
    /// Delivery failed and was logged as `Failed`.
    Failed {
        /// Error reported by the delivery channel.
        error: String,
    },
    /// Nothing was sent or logged.
    Skipped(SkipReason),
    /// Delivery was attempted but the log entry could not be written.
    LogWriteFailed {
        /// Status the entry would have been logged with.
        delivery_status: NotificationStatus,
        /// Error reported by the notification log.
        error: String,
    },
}

/// Outcome for one dose in a scan run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderOutcome {
    /// The qualifying dose.
    pub dose_record_id: DoseRecordId,
    /// Child the dose belongs to.
    pub child_id: ChildId,
    /// What the scan did with the dose.
    pub disposition: ReminderDisposition,
}

/// Summary of one scan run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// The due date the scan covered.
    pub window: ScanWindow,
    /// Pending doses due in the window when the snapshot was taken.
    pub candidates: usize,
    /// Reminders delivered and logged as `Sent`.
    pub sent: usize,
    /// Deliveries that failed and were logged as `Failed`.
    pub failed: usize,
    /// Candidates left alone; see [`SkipReason`].
    pub skipped: usize,
    /// Deliveries whose log entry could not be written.
    pub log_write_failures: usize,
    /// Set when the candidate snapshot itself could not be read.
    pub snapshot_error: Option<String>,
    /// One entry per candidate, in completion order.
    pub outcomes: Vec<ReminderOutcome>,
}

impl ScanReport {
    pub(super) fn from_outcomes(window: ScanWindow, outcomes: Vec<ReminderOutcome>) -> Self {
        let mut report = Self {
            window,
            candidates: outcomes.len(),
            sent: 0,
            failed: 0,
            skipped: 0,
            log_write_failures: 0,
            snapshot_error: None,
            outcomes: Vec::new(),
        };
        for outcome in &outcomes {
            match outcome.disposition {
                ReminderDisposition::Sent => report.sent += 1,
                ReminderDisposition::Failed { .. } => report.failed += 1,
                ReminderDisposition::Skipped(_) => report.skipped += 1,
                ReminderDisposition::LogWriteFailed { .. } => report.log_write_failures += 1,
            }
        }
        report.outcomes = outcomes;
        report
    }

    pub(super) fn snapshot_failed(window: ScanWindow, error: String) -> Self {
        Self {
            snapshot_error: Some(error),
            ..Self::from_outcomes(window, Vec::new())
        }
    }

    /// Outcome recorded for a dose, if it was a candidate.
    pub fn outcome_for(&self, dose_record_id: DoseRecordId) -> Option<&ReminderDisposition> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.dose_record_id == dose_record_id)
            .map(|outcome| &outcome.disposition)
    }
}
