//! Response construction helpers.

use bytes::Bytes;
use http::StatusCode;

use atrium_core::Response;

/// Builds an empty `200 OK` response with no headers.
#[must_use]
pub fn empty_response() -> Response {
    http::Response::builder()
        .body(Bytes::new())
        .expect("empty response builds")
}

/// Builds a `200 OK` response with a plain-text body.
#[must_use]
pub fn text_response(body: &str) -> Response {
    http::Response::builder()
        .status(StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Bytes::from(body.to_string()))
        .expect("text response builds")
}
