//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_input")]
    InvalidInput,
    /// No authenticated principal accompanies the request.
    #[schema(rename = "unauthenticated")]
    Unauthenticated,
    /// The caller lacks the role or is not a participant of the ride.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The ride does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The ride is not in the status the operation requires.
    #[schema(rename = "invalid_state")]
    InvalidState,
    /// Another driver already holds the ride.
    #[schema(rename = "ride_unavailable")]
    RideUnavailable,
    /// The ride has already been paid.
    #[schema(rename = "already_paid")]
    AlreadyPaid,
    /// Feedback for this ride was already submitted by the caller.
    #[schema(rename = "duplicate_feedback")]
    DuplicateFeedback,
    /// Storage is busy; the request may be retried.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_state")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "ride is ONGOING, expected REQUESTED")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as `currentStatus`.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_schema_has_expected_name_and_fields() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("message"));
        assert!(schema_json.contains("traceId"));
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        for code in [
            "invalid_input",
            "unauthenticated",
            "unauthorized",
            "not_found",
            "invalid_state",
            "ride_unavailable",
            "already_paid",
            "duplicate_feedback",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }
}
