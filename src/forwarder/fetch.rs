//! Outbound feed fetching.
//!
//! # Responsibilities
//! - Issue one GET per request with browser-like headers
//! - Follow redirects automatically
//! - Bound the fetch call (connect through response headers) by a deadline
//! - Read the body once the deadline is released
//!
//! # Design Decisions
//! - The HTTP client is built once and shared; each fetch is independent
//! - A timeout drops the in-flight request, which closes its connection
//! - A failed body read is a transport error, never a timeout
//! - No retries and no response inspection beyond status and content type

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use reqwest::{redirect, Client};
use url::Url;

use crate::resilience::timeouts::{with_deadline, DeadlineExceeded};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const ACCEPT: &str = "application/rss+xml, application/xml, text/xml, */*";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 20;

/// Error type for a single outbound fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The deadline elapsed and the request was cancelled.
    #[error(transparent)]
    Timeout(#[from] DeadlineExceeded),

    /// Connection, TLS, redirect or body-read failure.
    #[error("{}", describe(.0))]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}

/// Flatten an error and its sources into one line.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// A fully received upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamFeed {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Shared outbound client for feed requests.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Build a fetcher with the default client settings.
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(Self::client_builder().build()?))
    }

    /// Builder preconfigured with the redirect policy, for callers that
    /// need to customize the client (DNS overrides, proxies).
    pub fn client_builder() -> reqwest::ClientBuilder {
        Client::builder().redirect(redirect::Policy::limited(MAX_REDIRECTS))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GET `url`, cancelling the request if no response arrives within `limit`.
    ///
    /// The deadline covers the call up to the response headers; the body is
    /// read after the timer has been dropped.
    pub async fn fetch(&self, url: Url, limit: Duration) -> Result<UpstreamFeed, FetchError> {
        let request = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, ACCEPT)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE);

        let response = with_deadline(limit, request.send()).await??;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        Ok(UpstreamFeed {
            status,
            content_type,
            body,
        })
    }
}
