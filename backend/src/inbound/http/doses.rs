//! Dose status handler.
//!
//! ```text
//! PUT /api/v1/doses/{id} {"status":"Completed","notes":"left thigh"}
//! ```

use actix_web::{put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SetDoseStatusRequest;
use crate::domain::{DoseRecordId, DoseStatus, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::DoseRecordResponse;
use crate::inbound::http::session::SignedInGuardian;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, non_blank, parse_identifier, parse_optional_label,
};

const STATUSES: &str = "Pending, Completed, Missed, Skipped";

/// Request payload for a status change.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoseStatusRequest {
    #[schema(example = "Completed")]
    pub status: Option<String>,
    /// Replaces the stored notes when present.
    pub notes: Option<String>,
}

pub(crate) fn parse_dose_id(raw: &str) -> Result<DoseRecordId, Error> {
    parse_identifier(raw, FieldName::new("doseId"))
}

fn parse_status(payload: &DoseStatusRequest) -> Result<DoseStatus, Error> {
    let field = FieldName::new("status");
    parse_optional_label(non_blank(payload.status.as_deref()), field, STATUSES)?
        .ok_or_else(|| missing_field_error(field))
}

/// Set a dose's status.
///
/// Completing a dose stamps today's date in the reference zone; completing
/// it again keeps the first stamp. Moving away from `Completed` clears it.
#[utoipa::path(
    put,
    path = "/api/v1/doses/{id}",
    params(("id" = String, Path, description = "Dose record identifier")),
    request_body = DoseStatusRequest,
    responses(
        (status = 200, description = "Updated dose", body = DoseRecordResponse),
        (status = 400, description = "Missing or unknown status", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Dose belongs to another guardian's child", body = Error),
        (status = 404, description = "Dose not found", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["doses"],
    operation_id = "setDoseStatus"
)]
#[put("/doses/{id}")]
pub async fn set_dose_status(
    state: web::Data<HttpState>,
    guardian: SignedInGuardian,
    path: web::Path<String>,
    payload: web::Json<DoseStatusRequest>,
) -> ApiResult<web::Json<DoseRecordResponse>> {
    let requested_by = guardian.id();
    let dose_id = parse_dose_id(&path)?;
    let payload = payload.into_inner();
    let status = parse_status(&payload)?;
    let dose = state
        .doses
        .set_status(SetDoseStatusRequest {
            dose_id,
            status,
            notes: payload.notes,
            requested_by,
        })
        .await?;
    Ok(web::Json(DoseRecordResponse::from(&dose)))
}
