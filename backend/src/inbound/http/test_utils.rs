//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::{
    ChildEnrolmentService, DoseLifecycleService, Error, GuardianId, NotificationAuditService,
    ReferenceZone, VaccineCatalogue,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::test_support::clock::MutableClock;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// Stand-in for the identity collaborator: stores the path guardian id.
pub async fn test_login(
    session: SessionContext,
    path: web::Path<GuardianId>,
) -> Result<HttpResponse, Error> {
    session.persist_guardian(path.into_inner())?;
    Ok(HttpResponse::Ok().finish())
}

/// Log in through [`test_login`] mounted at `/test/login/{id}`.
pub async fn login_as<S>(app: &S, guardian_id: GuardianId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/test/login/{guardian_id}"))
            .to_request(),
    )
    .await;
    session_cookie(&res)
}

/// Real services over one in-memory store and a controllable clock.
pub struct MemoryWorld {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
}

impl MemoryWorld {
    /// A world whose clock reads 2024-02-11 09:00 UTC.
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            clock: Arc::new(MutableClock::at(2024, 2, 11, 9, 0)),
        }
    }

    pub fn http_state(&self) -> HttpState {
        let store = self.store.clone();
        HttpState::new(
            Arc::new(ChildEnrolmentService::new(
                store.clone(),
                store.clone(),
                Arc::new(VaccineCatalogue::national().clone()),
            )),
            Arc::new(DoseLifecycleService::new(
                store.clone(),
                store.clone(),
                self.clock.clone(),
                ReferenceZone::utc(),
            )),
            Arc::new(NotificationAuditService::new(
                store.clone(),
                store.clone(),
                store,
            )),
        )
    }
}
