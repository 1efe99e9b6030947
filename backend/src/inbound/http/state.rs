//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ChildEnrolment, DoseStatusCommand, NotificationAuditQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub enrolment: Arc<dyn ChildEnrolment>,
    pub doses: Arc<dyn DoseStatusCommand>,
    pub audit: Arc<dyn NotificationAuditQuery>,
}

impl HttpState {
    /// Construct state from the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use immunisation::domain::{
    ///     ChildEnrolmentService, DoseLifecycleService, NotificationAuditService,
    ///     VaccineCatalogue,
    /// };
    /// use immunisation::domain::ReferenceZone;
    /// use immunisation::inbound::http::state::HttpState;
    /// use immunisation::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let state = HttpState::new(
    ///     Arc::new(ChildEnrolmentService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         Arc::new(VaccineCatalogue::national().clone()),
    ///     )),
    ///     Arc::new(DoseLifecycleService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         clock,
    ///         ReferenceZone::utc(),
    ///     )),
    ///     Arc::new(NotificationAuditService::new(store.clone(), store.clone(), store)),
    /// );
    /// let _enrolment = state.enrolment.clone();
    /// ```
    pub fn new(
        enrolment: Arc<dyn ChildEnrolment>,
        doses: Arc<dyn DoseStatusCommand>,
        audit: Arc<dyn NotificationAuditQuery>,
    ) -> Self {
        Self {
            enrolment,
            doses,
            audit,
        }
    }
}
