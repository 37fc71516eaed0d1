//! Feed forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (method, query)
//!     → OPTIONS? answer 204 preflight
//!     → request.rs (extract `url`)             → 400 if absent
//!     → url::Url::parse                         → 502 if malformed
//!     → allowlist.rs (exact hostname match)     → 403 if absent
//!     → timeouts.rs (12s, or 20s for Google News)
//!     → fetch.rs (GET with fixed headers)       → 504 / 502 on failure
//!     → response.rs (relay status, body, content type + cache + CORS)
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing is shared between invocations except the client pool
//! - Methods other than OPTIONS take the fetch path; the outbound call is always GET
//! - Malformed target URLs report as fetch failures (502), not client errors

pub mod allowlist;
pub mod error;
pub mod fetch;

use std::time::{Duration, Instant};

use axum::http::Method;
use axum::response::{IntoResponse, Response};
use url::Url;

use crate::http::request::feed_url_param;
use crate::http::response::{preflight, relay_feed};
use crate::observability::metrics;
use crate::resilience::timeouts::TimeoutPolicy;

pub use allowlist::{Allowlist, ALLOWED_DOMAINS};
pub use error::ForwardError;
pub use fetch::{FeedFetcher, FetchError, UpstreamFeed};

/// What the forwarding path decides for a raw `url` value before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetVerdict {
    /// Not an absolute URL; answered as a fetch failure.
    Malformed(url::ParseError),
    /// Hostname missing from the allowlist (`""` for hostless URLs).
    Forbidden { domain: String },
    /// Will be fetched with `timeout` as its deadline.
    Allowed { target: Url, timeout: Duration },
}

/// Parse `raw`, check its hostname against `allowlist` and pick its deadline.
pub fn inspect_target(allowlist: &Allowlist, timeouts: TimeoutPolicy, raw: &str) -> TargetVerdict {
    let target = match Url::parse(raw) {
        Ok(target) => target,
        Err(e) => return TargetVerdict::Malformed(e),
    };

    let hostname = target.host_str().unwrap_or_default();
    if !allowlist.contains(hostname) {
        return TargetVerdict::Forbidden {
            domain: hostname.to_string(),
        };
    }

    TargetVerdict::Allowed {
        timeout: timeouts.for_url(raw),
        target,
    }
}

/// Validates and relays feed requests.
#[derive(Debug, Clone)]
pub struct Forwarder {
    allowlist: Allowlist,
    timeouts: TimeoutPolicy,
    fetcher: FeedFetcher,
}

impl Forwarder {
    pub fn new(allowlist: Allowlist, timeouts: TimeoutPolicy, fetcher: FeedFetcher) -> Self {
        Self {
            allowlist,
            timeouts,
            fetcher,
        }
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    pub fn timeouts(&self) -> TimeoutPolicy {
        self.timeouts
    }

    /// Handle one inbound request.
    ///
    /// `query` is the raw, percent-encoded query string of the request.
    pub async fn handle(&self, method: &Method, query: Option<&str>) -> Response {
        let start_time = Instant::now();

        if method == Method::OPTIONS {
            metrics::record_request("preflight", 204, start_time);
            return preflight();
        }

        match self.forward(query).await {
            Ok(feed) => {
                tracing::debug!(
                    status = %feed.status,
                    bytes = feed.body.len(),
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Feed relayed"
                );
                metrics::record_request("relayed", feed.status.as_u16(), start_time);
                relay_feed(feed.status, feed.content_type, feed.body)
            }
            Err(err) => {
                metrics::record_request(err.outcome(), err.status().as_u16(), start_time);
                err.into_response()
            }
        }
    }

    async fn forward(&self, query: Option<&str>) -> Result<UpstreamFeed, ForwardError> {
        let Some(feed_url) = feed_url_param(query) else {
            tracing::debug!("Request without url parameter");
            return Err(ForwardError::MissingParameter);
        };

        let (target, limit) = match inspect_target(&self.allowlist, self.timeouts, &feed_url) {
            TargetVerdict::Allowed { target, timeout } => (target, timeout),
            TargetVerdict::Malformed(e) => {
                tracing::error!(url = %feed_url, error = %e, "Feed proxy error");
                return Err(ForwardError::UpstreamFetchFailure {
                    details: e.to_string(),
                    url: feed_url,
                });
            }
            TargetVerdict::Forbidden { domain } => {
                tracing::warn!(url = %feed_url, domain = %domain, "Domain not allowed");
                return Err(ForwardError::DomainNotAllowed { domain });
            }
        };

        tracing::debug!(url = %feed_url, timeout_ms = limit.as_millis() as u64, "Fetching feed");

        self.fetcher.fetch(target, limit).await.map_err(|e| {
            tracing::error!(url = %feed_url, error = %e, "Feed proxy error");
            let details = e.to_string();
            if e.is_timeout() {
                ForwardError::UpstreamTimeout {
                    details,
                    url: feed_url,
                }
            } else {
                ForwardError::UpstreamFetchFailure {
                    details,
                    url: feed_url,
                }
            }
        })
    }
}
