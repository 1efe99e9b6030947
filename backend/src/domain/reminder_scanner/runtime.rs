//! Port bundle and configuration for the reminder scanner.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{
    ChildRepository, DeliveryChannel, DoseRecordRepository, GuardianDirectory,
    NotificationLogRepository,
};

/// Port bundle required by the reminder scanner.
pub struct ReminderScannerPorts {
    /// Source of the pending-dose snapshot.
    pub doses: Arc<dyn DoseRecordRepository>,
    /// Child lookup.
    pub children: Arc<dyn ChildRepository>,
    /// Guardian lookup for the recipient address.
    pub guardians: Arc<dyn GuardianDirectory>,
    /// Append-only audit log.
    pub log: Arc<dyn NotificationLogRepository>,
    /// Outward transport.
    pub delivery: Arc<dyn DeliveryChannel>,
}

/// Whether a dose that was already reminded is reminded again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReminderDedupePolicy {
    /// Every run reminds every qualifying dose, so a second run on the same
    /// day sends again.
    #[default]
    Disabled,
    /// Skip doses with a prior `Sent` entry; prior `Failed` entries allow a
    /// retry.
    SkipWhenSent,
}

/// Scanner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderScannerConfig {
    /// Upper bound on deliveries in flight at once.
    pub max_concurrent_deliveries: usize,
    /// Per-send time budget; exceeding it records a failure.
    pub delivery_timeout: Duration,
    /// Whether doses with a prior `Sent` entry are reminded again.
    pub dedupe: ReminderDedupePolicy,
}

impl Default for ReminderScannerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_deliveries: 4,
            delivery_timeout: Duration::from_secs(10),
            dedupe: ReminderDedupePolicy::Disabled,
        }
    }
}
