//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in the inbound HTTP layer, the response
//! DTOs, and the session cookie security scheme. Swagger UI serves it in
//! debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::children::ChildProfileRequest;
use crate::inbound::http::doses::DoseStatusRequest;
use crate::inbound::http::health::{ReadinessReport, StorageBackend};
use crate::inbound::http::schemas::{
    ChildDetailResponse, ChildResponse, DoseRecordResponse, NotificationLogEntryResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie carrying the guardian id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Immunisation schedule API",
        description = "Child enrolment, dose tracking and reminder history for guardians."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::children::list_children,
        crate::inbound::http::children::enrol_child,
        crate::inbound::http::children::get_child,
        crate::inbound::http::children::update_child,
        crate::inbound::http::children::delete_child,
        crate::inbound::http::doses::set_dose_status,
        crate::inbound::http::notifications::list_child_notifications,
        crate::inbound::http::notifications::list_dose_notifications,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ChildProfileRequest,
        DoseStatusRequest,
        ChildResponse,
        ChildDetailResponse,
        DoseRecordResponse,
        NotificationLogEntryResponse,
        ReadinessReport,
        StorageBackend,
    )),
    tags(
        (name = "children", description = "Enrolment and child profiles"),
        (name = "doses", description = "Dose status changes"),
        (name = "notifications", description = "Reminder delivery history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/children")]
    #[case("/api/v1/children/{id}")]
    #[case("/api/v1/children/{id}/notifications")]
    #[case("/api/v1/doses/{id}")]
    #[case("/api/v1/doses/{id}/notifications")]
    #[case("/health/ready")]
    fn document_lists_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn dose_schema_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let dose = schemas.get("DoseRecordResponse").expect("dose schema");

        assert_object_schema_has_field(dose, "vaccineName");
        assert_object_schema_has_field(dose, "dueDate");
        assert_object_schema_has_field(dose, "completionDate");
    }

    #[rstest]
    fn error_schema_has_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get("Error").expect("error schema");

        assert_object_schema_has_field(error, "code");
        assert_object_schema_has_field(error, "message");
    }
}
