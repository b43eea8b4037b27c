//! JSON and plain-text response helpers.

use bytes::Bytes;
use http::{header, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// Body of every error response.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub code: u16,
    pub message: String,
}

pub fn text(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    build(status, "text/plain; charset=utf-8", Bytes::from_static(body.as_bytes()))
}

pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => build(status, "application/json; charset=utf-8", Bytes::from(body)),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response body");
            error(StatusCode::INTERNAL_SERVER_ERROR, None)
        }
    }
}

/// Error response; `message` defaults to the canonical reason phrase.
pub fn error(status: StatusCode, message: Option<String>) -> Response<Full<Bytes>> {
    let message = message
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
    let body = StatusResponse {
        code: status.as_u16(),
        message,
    };
    // StatusResponse always serializes.
    let bytes = serde_json::to_vec(&body).unwrap_or_default();
    build(status, "application/json; charset=utf-8", Bytes::from(bytes))
}

fn build(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(body));
    *resp.status_mut() = status;
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static(content_type),
    );
    resp
}
