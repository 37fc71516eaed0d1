//! Timeout enforcement.
//!
//! # Responsibilities
//! - Choose the deadline for an outbound feed request
//! - Race the outbound call against that deadline
//! - Cancel the in-flight call cleanly when the deadline wins
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the timer lives inside the returned
//!   future and is dropped as soon as either branch settles
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::config::TimeoutConfig;

/// Substring that marks a URL as served by the Google News aggregator.
pub const GOOGLE_NEWS_HOST: &str = "news.google.com";

/// The deadline elapsed before the wrapped operation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation aborted after {}ms", .0.as_millis())]
pub struct DeadlineExceeded(pub Duration);

/// Maps a target URL to its outbound deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    feed: Duration,
    slow_feed: Duration,
}

impl TimeoutPolicy {
    pub fn new(feed: Duration, slow_feed: Duration) -> Self {
        Self { feed, slow_feed }
    }

    /// Deadline for `raw_url`.
    ///
    /// Keyed on a substring of the raw URL rather than its parsed host, so a
    /// Google News address anywhere in the URL selects the longer deadline.
    pub fn for_url(&self, raw_url: &str) -> Duration {
        if raw_url.contains(GOOGLE_NEWS_HOST) {
            self.slow_feed
        } else {
            self.feed
        }
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::from(&TimeoutConfig::default())
    }
}

impl From<&TimeoutConfig> for TimeoutPolicy {
    fn from(config: &TimeoutConfig) -> Self {
        Self::new(
            Duration::from_millis(config.feed_ms),
            Duration::from_millis(config.slow_feed_ms),
        )
    }
}

/// Run `fut` with a deadline.
///
/// If the deadline elapses first, `fut` is dropped (cancelling any I/O it
/// owns) and `DeadlineExceeded` is returned.
pub async fn with_deadline<F, T>(limit: Duration, fut: F) -> Result<T, DeadlineExceeded>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| DeadlineExceeded(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deadlines() {
        let policy = TimeoutPolicy::default();
        assert_eq!(
            policy.for_url("https://news.google.com/rss/search?q=un"),
            Duration::from_millis(20_000)
        );
        assert_eq!(
            policy.for_url("https://feeds.bbci.co.uk/news/rss.xml"),
            Duration::from_millis(12_000)
        );
    }

    #[test]
    fn test_substring_not_hostname() {
        let policy = TimeoutPolicy::default();
        // Host is rsshub.app, but the URL mentions the aggregator.
        assert_eq!(
            policy.for_url("https://rsshub.app/proxy?u=news.google.com"),
            Duration::from_millis(20_000)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses() {
        let result = with_deadline(Duration::from_millis(100), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        })
        .await;
        assert_eq!(result, Err(DeadlineExceeded(Duration::from_millis(100))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_not_reached() {
        let result = with_deadline(Duration::from_secs(13), async {
            tokio::time::sleep(Duration::from_secs(12)).await;
            "on time"
        })
        .await;
        assert_eq!(result, Ok("on time"));
    }

    #[test]
    fn test_deadline_message() {
        let err = DeadlineExceeded(Duration::from_millis(12_000));
        assert_eq!(err.to_string(), "operation aborted after 12000ms");
    }
}
