//! Builders wiring repositories, services and the reminder job.
//!
//! Storage is either PostgreSQL through Diesel or one shared in-memory store.
//! Both paths go through [`Repositories`] so services and the scanner always
//! see the same adapters.

use std::sync::Arc;

use immunisation::domain::ports::{
    ChildRepository, DeliveryChannel, DoseRecordRepository, GuardianDirectory,
    NotificationLogRepository,
};
use immunisation::domain::{
    ChildEnrolmentService, DoseLifecycleService, NotificationAuditService, ReminderScanner,
    ReminderScannerPorts, VaccineCatalogue,
};
use immunisation::inbound::http::health::StorageBackend;
use immunisation::inbound::http::state::HttpState;
use immunisation::outbound::delivery::{
    HttpRelayDeliveryChannel, RelayIdentity, UnconfiguredDeliveryChannel,
};
use immunisation::outbound::memory::InMemoryStore;
use immunisation::outbound::persistence::{
    DbPool, DieselChildRepository, DieselDoseRecordRepository, DieselGuardianDirectory,
    DieselNotificationLogRepository,
};
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use super::settings::{DeliverySettings, RuntimeSettings};

/// Everything the binary runs: HTTP state and the scheduled scanner.
pub struct AppComponents {
    pub http_state: HttpState,
    pub scanner: Arc<ReminderScanner>,
    /// Reported on the readiness check.
    pub storage: StorageBackend,
}

struct Repositories<C, D, G, L> {
    children: Arc<C>,
    doses: Arc<D>,
    guardians: Arc<G>,
    log: Arc<L>,
}

impl<C, D, G, L> Repositories<C, D, G, L>
where
    C: ChildRepository + 'static,
    D: DoseRecordRepository + 'static,
    G: GuardianDirectory + 'static,
    L: NotificationLogRepository + 'static,
{
    fn assemble(
        self,
        storage: StorageBackend,
        runtime: &RuntimeSettings,
        clock: Arc<dyn Clock>,
        delivery: Arc<dyn DeliveryChannel>,
    ) -> AppComponents {
        let catalogue = Arc::new(VaccineCatalogue::national().clone());
        let http_state = HttpState::new(
            Arc::new(ChildEnrolmentService::new(
                self.children.clone(),
                self.doses.clone(),
                catalogue,
            )),
            Arc::new(DoseLifecycleService::new(
                self.children.clone(),
                self.doses.clone(),
                clock.clone(),
                runtime.zone,
            )),
            Arc::new(NotificationAuditService::new(
                self.children.clone(),
                self.doses.clone(),
                self.log.clone(),
            )),
        );
        let scanner = ReminderScanner::new(
            ReminderScannerPorts {
                doses: self.doses,
                children: self.children,
                guardians: self.guardians,
                log: self.log,
                delivery,
            },
            clock,
            runtime.zone,
            runtime.scanner.clone(),
        );
        AppComponents {
            http_state,
            scanner: Arc::new(scanner),
            storage,
        }
    }
}

/// Select the outward delivery channel.
///
/// # Errors
/// Returns an error when the relay client cannot be constructed.
pub fn build_delivery_channel(
    settings: &DeliverySettings,
) -> std::io::Result<Arc<dyn DeliveryChannel>> {
    match settings {
        DeliverySettings::Relay {
            endpoint,
            sender,
            timeout,
        } => {
            let channel = HttpRelayDeliveryChannel::new(
                endpoint.clone(),
                RelayIdentity::new(sender.clone()),
                *timeout,
            )
            .map_err(|err| std::io::Error::other(format!("relay client: {err}")))?;
            info!(endpoint = %endpoint, "reminders delivered through e-mail relay");
            Ok(Arc::new(channel))
        }
        DeliverySettings::Unconfigured => {
            warn!("no delivery relay configured; reminders will be logged as sent");
            Ok(Arc::new(UnconfiguredDeliveryChannel))
        }
    }
}

/// Wire services over PostgreSQL when a pool is given, otherwise over a
/// fresh in-memory store.
pub fn build_components(
    runtime: &RuntimeSettings,
    pool: Option<DbPool>,
    delivery: Arc<dyn DeliveryChannel>,
) -> AppComponents {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match pool {
        Some(pool) => Repositories {
            children: Arc::new(DieselChildRepository::new(pool.clone())),
            doses: Arc::new(DieselDoseRecordRepository::new(pool.clone())),
            guardians: Arc::new(DieselGuardianDirectory::new(pool.clone())),
            log: Arc::new(DieselNotificationLogRepository::new(pool)),
        }
        .assemble(StorageBackend::Postgres, runtime, clock, delivery),
        None => {
            warn!("no database configured; using in-memory storage");
            warn!("in-memory storage has no guardian accounts; reminders will be skipped");
            let store = Arc::new(InMemoryStore::new());
            Repositories {
                children: store.clone(),
                doses: store.clone(),
                guardians: store.clone(),
                log: store,
            }
            .assemble(StorageBackend::InMemory, runtime, clock, delivery)
        }
    }
}
