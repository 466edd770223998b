//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes an `invalid_request` error whose details name the
//! offending field and a stable code.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidUuid,
    InvalidTimestamp,
    InvalidValue,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ValidationCode, message: String, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

/// Reject a value the domain refused, using the domain's message.
pub(crate) fn invalid_value_error(field: FieldName, reason: impl Display, value: Option<&str>) -> Error {
    field_error(field, ValidationCode::InvalidValue, reason.to_string(), value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        field_error(
            field,
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            Some(value),
        )
    })
}

pub(crate) fn parse_optional_uuid(value: Option<&str>, field: FieldName) -> Result<Option<Uuid>, Error> {
    value.map(|raw| parse_uuid(raw, field)).transpose()
}

pub(crate) fn parse_rfc3339_timestamp(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            field_error(
                field,
                ValidationCode::InvalidTimestamp,
                format!("{} must be an RFC 3339 timestamp", field.as_str()),
                Some(value),
            )
        })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

/// Parse `value` with `FromStr`, reporting the parser's message.
pub(crate) fn parse_text<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    value
        .parse::<T>()
        .map_err(|err| invalid_value_error(field, err, Some(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DonationStatus, ErrorCode};
    use rstest::rstest;

    const DONOR_ID: FieldName = FieldName::new("donorId");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error
            .details()
            .and_then(|details| details.get(key))
            .and_then(serde_json::Value::as_str)
    }

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ", true)]
    #[case("42", false)]
    fn uuids_are_parsed(#[case] raw: &str, #[case] ok: bool) {
        let result = parse_uuid(raw, DONOR_ID);
        assert_eq!(result.is_ok(), ok);
        if let Err(error) = result {
            assert_eq!(error.code(), ErrorCode::InvalidRequest);
            assert_eq!(detail(&error, "field"), Some("donorId"));
            assert_eq!(detail(&error, "code"), Some("invalid_uuid"));
            assert_eq!(detail(&error, "value"), Some(raw));
        }
    }

    #[rstest]
    fn timestamps_are_normalised_to_utc() {
        let parsed = parse_rfc3339_timestamp("2025-06-01T10:00:00+02:00", FieldName::new("at"))
            .expect("valid timestamp");
        assert_eq!(parsed.to_rfc3339(), "2025-06-01T08:00:00+00:00");
    }

    #[rstest]
    fn bad_timestamps_are_rejected() {
        let error = parse_optional_rfc3339_timestamp(Some("yesterday"), FieldName::new("at"))
            .expect_err("invalid timestamp");
        assert_eq!(detail(&error, "code"), Some("invalid_timestamp"));
    }

    #[rstest]
    fn text_parsing_reports_domain_messages() {
        let error = parse_text::<DonationStatus>("lost", FieldName::new("status"))
            .expect_err("unknown status");
        assert_eq!(
            error.message(),
            "donation status must be pending, completed or cancelled"
        );
        assert_eq!(detail(&error, "code"), Some("invalid_value"));
    }
}
