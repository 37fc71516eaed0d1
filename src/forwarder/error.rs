//! Error types for feed forwarding.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::response::with_cors;

/// Errors that terminate a forwarding request.
///
/// None are retried; each maps to one status code and a JSON body with an
/// `error` field plus context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForwardError {
    /// The `url` query parameter is absent or empty.
    #[error("Missing url parameter")]
    MissingParameter,

    /// The target host is not in the allowlist.
    #[error("Domain not allowed")]
    DomainNotAllowed { domain: String },

    /// The upstream did not answer within its deadline.
    #[error("Feed timeout")]
    UpstreamTimeout { details: String, url: String },

    /// Network failure, bad upstream scheme, or an unparseable target URL.
    #[error("Failed to fetch feed")]
    UpstreamFetchFailure { details: String, url: String },
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::MissingParameter => StatusCode::BAD_REQUEST,
            ForwardError::DomainNotAllowed { .. } => StatusCode::FORBIDDEN,
            ForwardError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ForwardError::UpstreamFetchFailure { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label used for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            ForwardError::MissingParameter => "missing_parameter",
            ForwardError::DomainNotAllowed { .. } => "domain_not_allowed",
            ForwardError::UpstreamTimeout { .. } => "timeout",
            ForwardError::UpstreamFetchFailure { .. } => "fetch_failed",
        }
    }

    fn body(&self) -> ErrorBody<'_> {
        let mut body = ErrorBody {
            error: self.to_string(),
            domain: None,
            details: None,
            url: None,
        };
        match self {
            ForwardError::MissingParameter => {}
            ForwardError::DomainNotAllowed { domain } => body.domain = Some(domain.as_str()),
            ForwardError::UpstreamTimeout { details, url }
            | ForwardError::UpstreamFetchFailure { details, url } => {
                body.details = Some(details.as_str());
                body.url = Some(url.as_str());
            }
        }
        body
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        with_cors((self.status(), Json(self.body())))
    }
}
