//! Tests for domain error construction and trace capture.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_input("bad"), ErrorCode::InvalidInput)]
#[case(Error::unauthenticated("login"), ErrorCode::Unauthenticated)]
#[case(Error::unauthorized("nope"), ErrorCode::Unauthorized)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::invalid_state("wrong status"), ErrorCode::InvalidState)]
#[case(Error::ride_unavailable("taken"), ErrorCode::RideUnavailable)]
#[case(Error::already_paid("paid"), ErrorCode::AlreadyPaid)]
#[case(Error::duplicate_feedback("twice"), ErrorCode::DuplicateFeedback)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn only_service_unavailable_is_retryable() {
    assert!(Error::service_unavailable("lock timeout").is_retryable());
    for error in [
        Error::ride_unavailable("taken"),
        Error::already_paid("paid"),
        Error::invalid_state("wrong status"),
        Error::internal("boom"),
    ] {
        assert!(!error.is_retryable(), "{:?} must not be retryable", error.code());
    }
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidInput, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn new_substitutes_default_message_for_blank_input() {
    let error = Error::new(ErrorCode::AlreadyPaid, "");
    assert_eq!(error.message(), "ride already paid");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::internal("boom").try_with_trace_id("  ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::not_found("missing") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_in_camel_case_and_skips_empty_fields(expected_trace_id: String) {
    let error = Error::invalid_state("ride is not completed")
        .with_trace_id(expected_trace_id)
        .with_details(json!({ "currentStatus": "ONGOING", "requiredStatus": "COMPLETED" }));
    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(value["code"], "invalid_state");
    assert_eq!(value["traceId"], TRACE_ID);
    assert_eq!(value["details"]["requiredStatus"], "COMPLETED");

    let bare = serde_json::to_value(Error::not_found("missing")).expect("serialise error");
    assert!(bare.get("traceId").is_none());
    assert!(bare.get("details").is_none());
}
