//! Tests for relay error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn response_payload(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error JSON");
    (status, header, body)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::upstream("Failed to create user"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[actix_web::test]
async fn upstream_failures_embed_provider_body_verbatim() {
    let provider_body = json!({ "error": { "code": "invalid_token", "message": "Expired" } });
    let error = Error::upstream("Failed to exchange token")
        .with_details(provider_body.clone())
        .with_trace_id(TRACE_ID);

    let (status, header, body) = response_payload(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body["error"], json!("Failed to exchange token"));
    assert_eq!(body["code"], json!("upstream_failure"));
    assert_eq!(body["details"], provider_body);
    assert_eq!(body["traceId"], json!(TRACE_ID));
}

#[actix_web::test]
async fn upstream_failures_without_provider_body_omit_details() {
    let (_, header, body) = response_payload(&Error::upstream("Failed to get bridge token")).await;

    assert!(header.is_none(), "no trace in scope means no header");
    assert!(body.get("details").is_none());
    assert!(body.get("traceId").is_none());
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("database exploded")
        .with_details(json!({ "secret": "x" }))
        .with_trace_id(TRACE_ID);

    let (_, _, body) = response_payload(&error).await;

    assert_eq!(body["error"], json!("Internal server error"));
    assert!(body.get("details").is_none());
    assert_eq!(body["traceId"], json!(TRACE_ID));
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async { Error::upstream("boom") }).await;
    assert_eq!(error.trace_id.as_deref(), Some(TRACE_ID));
}

#[test]
fn payload_round_trips_through_json() {
    let error = Error::invalid_request("user_id is required")
        .with_details(json!({ "field": "user_id", "code": "missing_field" }));
    let encoded = serde_json::to_string(&error).expect("serialise");
    let decoded: Error = serde_json::from_str(&encoded).expect("deserialise");
    assert_eq!(decoded, error);
}
