//! Daily reminder scan.
//!
//! A run computes tomorrow's window once, snapshots the pending doses due on
//! that date, and processes each dose as an independent unit: resolve child
//! and guardian, send one reminder, append one log entry. No failure in one
//! unit stops the others, and nothing in a run is returned as an error; the
//! [`ScanReport`] and the log are the only observable results.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::{StreamExt, stream};
use mockable::Clock;
use tracing::{debug, error, info, warn};

use crate::domain::daily_scheduler::ScheduledJob;
use crate::domain::ports::{
    ChildRepository, DeliveryChannel, DeliveryError, DeliveryReceipt, DoseRecordRepository,
    GuardianDirectory, NotificationLogRepository, OutboundMessage,
};
use crate::domain::{
    Child, DoseRecord, Guardian, NotificationLogEntry, NotificationStatus, ReferenceZone,
};

mod message;
mod report;
mod runtime;
mod window;

pub use message::{REMINDER_SUBJECT, reminder_body};
pub use report::{ReminderDisposition, ReminderOutcome, ScanReport, SkipReason};
pub use runtime::{ReminderDedupePolicy, ReminderScannerConfig, ReminderScannerPorts};
pub use window::ScanWindow;

/// Domain-owned reminder scanner.
pub struct ReminderScanner {
    doses: Arc<dyn DoseRecordRepository>,
    children: Arc<dyn ChildRepository>,
    guardians: Arc<dyn GuardianDirectory>,
    log: Arc<dyn NotificationLogRepository>,
    delivery: Arc<dyn DeliveryChannel>,
    clock: Arc<dyn Clock>,
    zone: ReferenceZone,
    config: ReminderScannerConfig,
}

impl ReminderScanner {
    /// Build a scanner.
    pub fn new(
        ports: ReminderScannerPorts,
        clock: Arc<dyn Clock>,
        zone: ReferenceZone,
        config: ReminderScannerConfig,
    ) -> Self {
        Self {
            doses: ports.doses,
            children: ports.children,
            guardians: ports.guardians,
            log: ports.log,
            delivery: ports.delivery,
            clock,
            zone,
            config,
        }
    }

    /// Run one scan as of `now`.
    pub async fn scan(&self, now: DateTime<Utc>) -> ScanReport {
        let window = ScanWindow::tomorrow(now, self.zone);
        let candidates = match self.doses.list_pending_due_on(window.due_date()).await {
            Ok(doses) => doses,
            Err(err) => {
                error!(
                    due_date = %window.due_date(),
                    error_kind = err.kind(),
                    error = %err,
                    "reminder scan could not read pending doses"
                );
                return ScanReport::snapshot_failed(window, err.to_string());
            }
        };

        let limit = self.config.max_concurrent_deliveries.max(1);
        let outcomes = stream::iter(candidates)
            .map(|dose| self.remind(dose, window))
            .buffer_unordered(limit)
            .collect::<Vec<_>>()
            .await;

        ScanReport::from_outcomes(window, outcomes)
    }

    async fn remind(&self, dose: DoseRecord, window: ScanWindow) -> ReminderOutcome {
        let disposition = match self.resolve(&dose).await {
            Ok((child, guardian)) => self.deliver_and_log(&dose, &child, &guardian, window).await,
            Err(reason) => ReminderDisposition::Skipped(reason),
        };
        ReminderOutcome {
            dose_record_id: dose.id(),
            child_id: dose.child_id(),
            disposition,
        }
    }

    async fn resolve(&self, dose: &DoseRecord) -> Result<(Child, Guardian), SkipReason> {
        let child = match self.children.find_by_id(&dose.child_id()).await {
            Ok(Some(child)) => child,
            Ok(None) => {
                debug!(
                    dose_record_id = %dose.id(),
                    child_id = %dose.child_id(),
                    "dose has no child; skipped"
                );
                return Err(SkipReason::ChildMissing);
            }
            Err(err) => {
                error!(
                    dose_record_id = %dose.id(),
                    error = %err,
                    "child lookup failed during reminder scan"
                );
                return Err(SkipReason::LookupFailed(err.to_string()));
            }
        };

        let guardian = match self.guardians.find_by_id(&child.guardian_id()).await {
            Ok(Some(guardian)) => guardian,
            Ok(None) => {
                debug!(
                    dose_record_id = %dose.id(),
                    guardian_id = %child.guardian_id(),
                    "child has no guardian; skipped"
                );
                return Err(SkipReason::GuardianMissing);
            }
            Err(err) => {
                error!(
                    dose_record_id = %dose.id(),
                    error = %err,
                    "guardian lookup failed during reminder scan"
                );
                return Err(SkipReason::LookupFailed(err.to_string()));
            }
        };

        if self.config.dedupe == ReminderDedupePolicy::SkipWhenSent {
            match self.log.list_for_dose(&dose.id()).await {
                Ok(entries)
                    if entries
                        .iter()
                        .any(|entry| entry.status == NotificationStatus::Sent) =>
                {
                    return Err(SkipReason::AlreadyReminded);
                }
                Ok(_) => {}
                Err(err) => {
                    error!(
                        dose_record_id = %dose.id(),
                        error = %err,
                        "dedupe lookup failed during reminder scan"
                    );
                    return Err(SkipReason::LookupFailed(err.to_string()));
                }
            }
        }

        Ok((child, guardian))
    }

    async fn deliver_and_log(
        &self,
        dose: &DoseRecord,
        child: &Child,
        guardian: &Guardian,
        window: ScanWindow,
    ) -> ReminderDisposition {
        let body = reminder_body(child.name(), dose.vaccine_name(), window.due_date());
        let message = OutboundMessage {
            recipient: guardian.email().clone(),
            subject: REMINDER_SUBJECT.to_owned(),
            body,
        };

        let delivery = self.send_with_timeout(&message).await;
        let attempted_at = self.clock.utc();
        let entry = match &delivery {
            Ok(_) => {
                NotificationLogEntry::sent(child.id(), dose.id(), &message.body, attempted_at)
            }
            Err(err) => NotificationLogEntry::failed(
                child.id(),
                dose.id(),
                &message.body,
                attempted_at,
                err.to_string(),
            ),
        };

        if let Err(err) = self.log.append(&entry).await {
            error!(
                dose_record_id = %dose.id(),
                child_id = %child.id(),
                delivery_status = %entry.status,
                error = %err,
                "reminder log entry could not be written"
            );
            return ReminderDisposition::LogWriteFailed {
                delivery_status: entry.status,
                error: err.to_string(),
            };
        }

        match delivery {
            Ok(_) => {
                info!(
                    dose_record_id = %dose.id(),
                    child_id = %child.id(),
                    outcome = "sent",
                    "reminder sent"
                );
                ReminderDisposition::Sent
            }
            Err(err) => {
                warn!(
                    dose_record_id = %dose.id(),
                    child_id = %child.id(),
                    outcome = "failed",
                    error_kind = err.kind(),
                    error = %err,
                    "reminder delivery failed"
                );
                ReminderDisposition::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    async fn send_with_timeout(
        &self,
        message: &OutboundMessage,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let budget = self.config.delivery_timeout;
        match tokio::time::timeout(budget, self.delivery.send(message)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::timeout(budget.as_secs())),
        }
    }
}

#[async_trait]
impl ScheduledJob for ReminderScanner {
    fn name(&self) -> &'static str {
        "reminder-scan"
    }

    async fn run(&self, now: DateTime<Utc>) {
        let report = self.scan(now).await;
        info!(
            due_date = %report.window.due_date(),
            candidates = report.candidates,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            log_write_failures = report.log_write_failures,
            "reminder scan finished"
        );
    }
}
