//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request payloads carry plain strings; these helpers turn them into domain
//! values and report failures with a `field`/`code` details object.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidValue,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidDate => "invalid_date",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ValidationCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    Error::invalid_request(format!("missing required field: {}", field.as_str())).with_details(
        json!({
            "field": field.as_str(),
            "code": ValidationCode::MissingField.as_str(),
        }),
    )
}

/// Treat absent and blank strings alike.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Parse an identifier taken from the path or body.
pub(crate) fn parse_identifier<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.parse().map_err(|_| {
        field_error(
            field,
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

/// Parse an optional `YYYY-MM-DD` calendar date.
pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                field_error(
                    field,
                    ValidationCode::InvalidDate,
                    format!("{} must be a YYYY-MM-DD date", field.as_str()),
                    raw,
                )
            })
        })
        .transpose()
}

/// Parse an optional label into one of a fixed set of domain values.
pub(crate) fn parse_optional_label<T: FromStr>(
    value: Option<&str>,
    field: FieldName,
    expected: &'static str,
) -> Result<Option<T>, Error> {
    value
        .map(|raw| {
            raw.trim().parse().map_err(|_| {
                field_error(
                    field,
                    ValidationCode::InvalidValue,
                    format!("{} must be one of {expected}", field.as_str()),
                    raw,
                )
            })
        })
        .transpose()
}
