//! Assertions on the JSON error contract, without depending on backend types.
//!
//! Every error response carries `{code, message, error, trace_id}` and an
//! `x-trace-id` header equal to the body's `trace_id`.

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct ErrorBodyLike {
    pub code: u16,
    pub message: String,
    pub error: String,
    pub trace_id: String,
}

/// Assert status, machine-readable code and trace-id parity, returning the
/// parsed body for further checks on `message`.
pub fn assert_error_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_status: StatusCode,
    expected_error: &str,
) -> ErrorBodyLike {
    assert_eq!(
        status,
        expected_status,
        "unexpected status; body: {}",
        String::from_utf8_lossy(body)
    );

    let parsed: ErrorBodyLike = serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "error body is not the expected JSON shape ({e}): {}",
            String::from_utf8_lossy(body)
        )
    });

    assert_eq!(parsed.code, expected_status.as_u16(), "body code != status");
    assert_eq!(parsed.error, expected_error);
    assert!(!parsed.message.is_empty(), "message must not be empty");

    let header_trace = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_else(|| panic!("x-trace-id header missing or not ASCII"));
    assert_eq!(parsed.trace_id, header_trace, "trace id parity");

    parsed
}
