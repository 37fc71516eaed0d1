//! Response assembly.
//!
//! # Responsibilities
//! - Attach the fixed CORS headers to every response
//! - Relay an upstream feed: status, body and content type unchanged
//! - Add the shared-cache directive to relayed feeds
//! - Answer CORS preflight requests
//!
//! # Design Decisions
//! - Feed bodies are relayed as raw bytes, never decoded or re-encoded
//! - Missing upstream content type defaults to `application/xml`
//! - Error bodies are rendered by `forwarder::error`, not here

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

pub const ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");
pub const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, OPTIONS");
pub const ALLOW_HEADERS: HeaderValue = HeaderValue::from_static("Content-Type");

/// Cache directive for successfully relayed feeds.
pub const FEED_CACHE_CONTROL: HeaderValue =
    HeaderValue::from_static("public, max-age=600, s-maxage=600, stale-while-revalidate=300");

/// Content type used when the upstream does not declare one.
pub const DEFAULT_FEED_CONTENT_TYPE: HeaderValue = HeaderValue::from_static("application/xml");

/// Insert the CORS headers, replacing any existing values.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN);
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS);
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS);
}

/// Wrap any response so it carries the CORS headers.
pub fn with_cors(response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    apply_cors(response.headers_mut());
    response
}

/// 204 with CORS headers and no body.
pub fn preflight() -> Response {
    with_cors(StatusCode::NO_CONTENT)
}

/// Relay a fetched feed to the client.
pub fn relay_feed(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        content_type.unwrap_or(DEFAULT_FEED_CONTENT_TYPE),
    );
    headers.insert(header::CACHE_CONTROL, FEED_CACHE_CONTROL);
    apply_cors(headers);

    response
}
