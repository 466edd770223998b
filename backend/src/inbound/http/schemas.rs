//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; the wrappers here mirror their
//! serialised shape so the adapter layer owns the documentation concern.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// Duplicate email or other state clash.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "User not found")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(example = "2f0a5c1e-8d7b-4d55-9a1c-6f1e2b3c4d5e")]
    trace_id: Option<String>,
    /// Field-level context such as `{"field": "email", "code": "duplicate_email"}`.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    #[test]
    fn error_code_schema_lists_every_code() {
        let json = serde_json::to_string(&ErrorCodeSchema::schema()).expect("schema serialises");
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_camel_case() {
        let json = serde_json::to_string(&ErrorSchema::schema()).expect("schema serialises");
        assert!(json.contains("traceId"));
    }
}
