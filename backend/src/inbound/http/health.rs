//! Liveness and readiness checks.
//!
//! Readiness reports what reminders depend on: the storage backend that was
//! wired and whether the daily reminder scheduler is running. The service
//! takes traffic only once both are up and stops as soon as it starts
//! draining.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Storage the repositories were wired over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    Postgres,
    /// Process-local; nothing survives a restart.
    InMemory,
}

/// Body of the readiness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    /// Absent until storage has been wired.
    pub storage: Option<StorageBackend>,
    pub reminder_scheduler_running: bool,
    pub draining: bool,
}

/// Shared health state, updated by the binary as it starts and stops.
#[derive(Default)]
pub struct HealthState {
    storage: OnceLock<StorageBackend>,
    scheduler_running: AtomicBool,
    draining: AtomicBool,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the storage backend. The first call wins.
    pub fn mark_storage_ready(&self, backend: StorageBackend) {
        let _ = self.storage.set(backend);
    }

    pub fn set_scheduler_running(&self, running: bool) {
        self.scheduler_running.store(running, Ordering::Release);
    }

    /// Fail both checks so orchestrators stop routing during shutdown.
    pub fn mark_draining(&self) {
        self.draining.store(true, Ordering::Release);
    }

    pub fn readiness(&self) -> ReadinessReport {
        ReadinessReport {
            storage: self.storage.get().copied(),
            reminder_scheduler_running: self.scheduler_running.load(Ordering::Acquire),
            draining: self.draining.load(Ordering::Acquire),
        }
    }

    pub fn is_ready(&self) -> bool {
        let report = self.readiness();
        report.storage.is_some() && report.reminder_scheduler_running && !report.draining
    }

    pub fn is_alive(&self) -> bool {
        !self.draining.load(Ordering::Acquire)
    }
}

fn check_status(healthy: bool) -> actix_web::HttpResponseBuilder {
    let mut response = if healthy {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response.insert_header((header::CACHE_CONTROL, "no-store"));
    response
}

/// Readiness check.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Storage wired and reminder scheduler running", body = ReadinessReport),
        (status = 503, description = "Starting up or draining", body = ReadinessReport)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    check_status(state.is_ready()).json(state.readiness())
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    check_status(state.is_alive()).finish()
}
