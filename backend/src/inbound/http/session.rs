//! Guardian identity carried in the session cookie.
//!
//! The identity collaborator authenticates guardians and stores the guardian
//! id in the encrypted session cookie. API handlers take a
//! [`SignedInGuardian`] and never touch the session directly; a missing or
//! tampered id rejects the request with `401` before the handler runs.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::{Span, field, warn};

use crate::domain::{Error, GuardianId};

pub(crate) const GUARDIAN_ID_KEY: &str = "guardian_id";

/// Guardian-level view of the Actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated guardian's id in the session cookie.
    pub fn persist_guardian(&self, guardian_id: GuardianId) -> Result<(), Error> {
        self.0
            .insert(GUARDIAN_ID_KEY, guardian_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The guardian id in the cookie, if present and well formed.
    pub fn guardian_id(&self) -> Result<Option<GuardianId>, Error> {
        let raw = self
            .0
            .get::<String>(GUARDIAN_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match raw.parse::<GuardianId>() {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid guardian id in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated guardian or return `401 Unauthorized`.
    pub fn require_guardian_id(&self) -> Result<GuardianId, Error> {
        self.guardian_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// The guardian making the request.
///
/// Extraction records the id on the request span so every log line for the
/// request names the guardian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedInGuardian(GuardianId);

impl SignedInGuardian {
    pub fn id(self) -> GuardianId {
        self.0
    }
}

impl FromRequest for SignedInGuardian {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let guardian_id = fut.await?.require_guardian_id()?;
            Span::current().record("guardian_id", field::display(guardian_id));
            Ok::<_, actix_web::Error>(SignedInGuardian(guardian_id))
        })
    }
}
