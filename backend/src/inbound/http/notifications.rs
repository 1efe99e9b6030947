//! Reminder audit handlers.
//!
//! ```text
//! GET /api/v1/children/{id}/notifications
//! GET /api/v1/doses/{id}/notifications
//! ```

use actix_web::{get, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::children::parse_child_id;
use crate::inbound::http::doses::parse_dose_id;
use crate::inbound::http::schemas::NotificationLogEntryResponse;
use crate::inbound::http::session::SignedInGuardian;
use crate::inbound::http::state::HttpState;

/// Reminder history for a child, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/children/{id}/notifications",
    params(("id" = String, Path, description = "Child identifier")),
    responses(
        (status = 200, description = "Log entries", body = [NotificationLogEntryResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Child belongs to another guardian", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listChildNotifications"
)]
#[get("/children/{id}/notifications")]
pub async fn list_child_notifications(
    state: web::Data<HttpState>,
    guardian: SignedInGuardian,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<NotificationLogEntryResponse>>> {
    let guardian_id = guardian.id();
    let child_id = parse_child_id(&path)?;
    let entries = state.audit.list_for_child(child_id, guardian_id).await?;
    Ok(web::Json(
        entries.iter().map(NotificationLogEntryResponse::from).collect(),
    ))
}

/// Reminder history for one dose, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/doses/{id}/notifications",
    params(("id" = String, Path, description = "Dose record identifier")),
    responses(
        (status = 200, description = "Log entries", body = [NotificationLogEntryResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Dose belongs to another guardian's child", body = Error),
        (status = 404, description = "Dose not found", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listDoseNotifications"
)]
#[get("/doses/{id}/notifications")]
pub async fn list_dose_notifications(
    state: web::Data<HttpState>,
    guardian: SignedInGuardian,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<NotificationLogEntryResponse>>> {
    let guardian_id = guardian.id();
    let dose_id = parse_dose_id(&path)?;
    let entries = state.audit.list_for_dose(dose_id, guardian_id).await?;
    Ok(web::Json(
        entries.iter().map(NotificationLogEntryResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{
        MockChildEnrolment, MockDoseStatusCommand, MockNotificationAuditQuery,
    };
    use crate::domain::{ChildId, DoseRecordId, GuardianId, NotificationLogEntry};
    use crate::inbound::http::test_utils::{login_as, test_login, test_session_middleware};

    fn state_with(audit: MockNotificationAuditQuery) -> HttpState {
        HttpState::new(
            Arc::new(MockChildEnrolment::new()),
            Arc::new(MockDoseStatusCommand::new()),
            Arc::new(audit),
        )
    }

    #[actix_web::test]
    async fn child_history_is_rendered_in_order_given() {
        let guardian_id = GuardianId::random();
        let child_id = ChildId::random();
        let dose_id = DoseRecordId::random();
        let at = Utc
            .with_ymd_and_hms(2024, 2, 11, 9, 0, 0)
            .single()
            .expect("valid time");
        let entries = vec![
            NotificationLogEntry::failed(child_id, dose_id, "second", at, "relay down"),
            NotificationLogEntry::sent(child_id, dose_id, "first", at),
        ];
        let mut audit = MockNotificationAuditQuery::new();
        audit
            .expect_list_for_child()
            .withf(move |child, guardian| *child == child_id && *guardian == guardian_id)
            .return_once(move |_, _| Ok(entries));

        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(audit)))
                .wrap(test_session_middleware())
                .route("/test/login/{id}", web::get().to(test_login))
                .service(web::scope("/api/v1").service(list_child_notifications)),
        )
        .await;
        let cookie = login_as(&app, guardian_id).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/children/{child_id}/notifications"))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        let messages: Vec<_> = body
            .as_array()
            .expect("array")
            .iter()
            .map(|entry| entry["message"].as_str().expect("message"))
            .collect();
        assert_eq!(messages, ["second", "first"]);
    }

    #[actix_web::test]
    async fn malformed_dose_id_is_rejected_before_lookup() {
        let mut audit = MockNotificationAuditQuery::new();
        audit.expect_list_for_dose().times(0);

        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(audit)))
                .wrap(test_session_middleware())
                .route("/test/login/{id}", web::get().to(test_login))
                .service(web::scope("/api/v1").service(list_dose_notifications)),
        )
        .await;
        let cookie = login_as(&app, GuardianId::random()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/doses/not-a-uuid/notifications")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "doseId");
    }
}
