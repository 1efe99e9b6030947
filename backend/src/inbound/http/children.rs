//! Child enrolment and profile handlers.
//!
//! ```text
//! GET    /api/v1/children
//! POST   /api/v1/children
//! GET    /api/v1/children/{id}
//! PUT    /api/v1/children/{id}
//! DELETE /api/v1/children/{id}
//! ```

use actix_web::{HttpResponse, delete, get, http::header, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BloodGroup, ChildDraft, ChildId, ChildProfileUpdate, Error, Gender};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ChildDetailResponse, ChildResponse};
use crate::inbound::http::session::SignedInGuardian;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, non_blank, parse_identifier, parse_optional_date, parse_optional_label,
};

const GENDERS: &str = "Male, Female, Other";
const BLOOD_GROUPS: &str = "A+, A-, B+, B-, AB+, AB-, O+, O-, Unknown";

/// Child profile fields as submitted by a form or import row.
///
/// Used by both enrolment and profile updates. On enrolment `name`,
/// `dateOfBirth` and `gender` are required; on update every field is
/// optional and `dateOfBirth` may only repeat the recorded value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfileRequest {
    #[schema(example = "Meera")]
    pub name: Option<String>,
    #[schema(example = "2024-01-01")]
    pub date_of_birth: Option<String>,
    #[schema(example = "Female")]
    pub gender: Option<String>,
    #[schema(example = "O+")]
    pub blood_group: Option<String>,
    pub medical_history: Option<String>,
}

struct ParsedProfile {
    name: Option<String>,
    date_of_birth: Option<chrono::NaiveDate>,
    gender: Option<Gender>,
    blood_group: Option<BloodGroup>,
    medical_history: Option<String>,
}

fn parse_profile(payload: ChildProfileRequest) -> Result<ParsedProfile, Error> {
    let date_of_birth = parse_optional_date(
        non_blank(payload.date_of_birth.as_deref()),
        FieldName::new("dateOfBirth"),
    )?;
    let gender = parse_optional_label(
        non_blank(payload.gender.as_deref()),
        FieldName::new("gender"),
        GENDERS,
    )?;
    let blood_group = parse_optional_label(
        non_blank(payload.blood_group.as_deref()),
        FieldName::new("bloodGroup"),
        BLOOD_GROUPS,
    )?;
    Ok(ParsedProfile {
        name: payload.name,
        date_of_birth,
        gender,
        blood_group,
        medical_history: payload.medical_history,
    })
}

impl From<ParsedProfile> for ChildDraft {
    fn from(value: ParsedProfile) -> Self {
        Self {
            name: value.name,
            date_of_birth: value.date_of_birth,
            gender: value.gender,
            blood_group: value.blood_group,
            medical_history: value.medical_history,
        }
    }
}

impl From<ParsedProfile> for ChildProfileUpdate {
    fn from(value: ParsedProfile) -> Self {
        Self {
            name: value.name,
            date_of_birth: value.date_of_birth,
            gender: value.gender,
            blood_group: value.blood_group,
            medical_history: value.medical_history,
        }
    }
}

pub(crate) fn parse_child_id(raw: &str) -> Result<ChildId, Error> {
    parse_identifier(raw, FieldName::new("childId"))
}

/// List the authenticated guardian's children, oldest enrolment first.
#[utoipa::path(
    get,
    path = "/api/v1/children",
    responses(
        (status = 200, description = "Children", body = [ChildResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["children"],
    operation_id = "listChildren"
)]
#[get("/children")]
pub async fn list_children(
    state: web::Data<HttpState>,
    guardian: SignedInGuardian,
) -> ApiResult<web::Json<Vec<ChildResponse>>> {
    let guardian_id = guardian.id();
    let children = state.enrolment.list_children(guardian_id).await?;
    Ok(web::Json(children.iter().map(ChildResponse::from).collect()))
}

/// Enrol a child and generate the dose schedule from the date of birth.
#[utoipa::path(
    post,
    path = "/api/v1/children",
    request_body = ChildProfileRequest,
    responses(
        (
            status = 201,
            description = "Child enrolled",
            headers(("Location" = String, description = "URI of the new child")),
            body = ChildDetailResponse
        ),
        (status = 400, description = "Missing or invalid fields", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["children"],
    operation_id = "enrolChild"
)]
#[post("/children")]
pub async fn enrol_child(
    state: web::Data<HttpState>,
    guardian: SignedInGuardian,
    payload: web::Json<ChildProfileRequest>,
) -> ApiResult<HttpResponse> {
    let guardian_id = guardian.id();
    let draft = ChildDraft::from(parse_profile(payload.into_inner())?);
    let child = state.enrolment.enrol_child(guardian_id, draft).await?;
    let schedule = state.enrolment.get_schedule(child.id(), guardian_id).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/v1/children/{}", child.id())))
        .json(ChildDetailResponse::new(&child, &schedule)))
}

/// Fetch one child with its schedule sorted by due date.
#[utoipa::path(
    get,
    path = "/api/v1/children/{id}",
    params(("id" = String, Path, description = "Child identifier")),
    responses(
        (status = 200, description = "Child and schedule", body = ChildDetailResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Child belongs to another guardian", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["children"],
    operation_id = "getChild"
)]
#[get("/children/{id}")]
pub async fn get_child(
    state: web::Data<HttpState>,
    guardian: SignedInGuardian,
    path: web::Path<String>,
) -> ApiResult<web::Json<ChildDetailResponse>> {
    let guardian_id = guardian.id();
    let child_id = parse_child_id(&path)?;
    let child = state.enrolment.get_child(child_id, guardian_id).await?;
    let schedule = state.enrolment.get_schedule(child_id, guardian_id).await?;
    Ok(web::Json(ChildDetailResponse::new(&child, &schedule)))
}

/// Edit a child's profile. The date of birth cannot change.
#[utoipa::path(
    put,
    path = "/api/v1/children/{id}",
    params(("id" = String, Path, description = "Child identifier")),
    request_body = ChildProfileRequest,
    responses(
        (status = 200, description = "Updated child", body = ChildResponse),
        (status = 400, description = "Invalid fields or date of birth change", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Child belongs to another guardian", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["children"],
    operation_id = "updateChild"
)]
#[put("/children/{id}")]
pub async fn update_child(
    state: web::Data<HttpState>,
    guardian: SignedInGuardian,
    path: web::Path<String>,
    payload: web::Json<ChildProfileRequest>,
) -> ApiResult<web::Json<ChildResponse>> {
    let guardian_id = guardian.id();
    let child_id = parse_child_id(&path)?;
    let update = ChildProfileUpdate::from(parse_profile(payload.into_inner())?);
    let child = state
        .enrolment
        .update_profile(child_id, guardian_id, update)
        .await?;
    Ok(web::Json(ChildResponse::from(&child)))
}

/// Delete a child and its whole schedule. Reminder history is kept.
#[utoipa::path(
    delete,
    path = "/api/v1/children/{id}",
    params(("id" = String, Path, description = "Child identifier")),
    responses(
        (status = 204, description = "Child deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Child belongs to another guardian", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["children"],
    operation_id = "deleteChild"
)]
#[delete("/children/{id}")]
pub async fn delete_child(
    state: web::Data<HttpState>,
    guardian: SignedInGuardian,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let guardian_id = guardian.id();
    let child_id = parse_child_id(&path)?;
    state.enrolment.delete_child(child_id, guardian_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "children_tests.rs"]
mod tests;
