//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Extract the target feed address from the query string
//!
//! # Design Decisions
//! - Request ID added as early as possible and echoed on the response
//! - Only the first `url` parameter counts; an empty value counts as absent

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Name of the query parameter holding the target feed URL.
pub const FEED_URL_PARAM: &str = "url";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Read the target feed URL from a raw (still percent-encoded) query string.
pub fn feed_url_param(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == FEED_URL_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_url_param() {
        let query = "url=https%3A%2F%2Ffeeds.bbci.co.uk%2Fnews%2Frss.xml";
        assert_eq!(
            feed_url_param(Some(query)).as_deref(),
            Some("https://feeds.bbci.co.uk/news/rss.xml")
        );
    }

    #[test]
    fn test_missing_or_empty_is_none() {
        assert_eq!(feed_url_param(None), None);
        assert_eq!(feed_url_param(Some("")), None);
        assert_eq!(feed_url_param(Some("feed=x")), None);
        assert_eq!(feed_url_param(Some("url=")), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let query = "url=https://a.example/1&url=https://b.example/2";
        assert_eq!(feed_url_param(Some(query)).as_deref(), Some("https://a.example/1"));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let request = Request::new(());
        let mut maker = MakeRequestUuid;
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
