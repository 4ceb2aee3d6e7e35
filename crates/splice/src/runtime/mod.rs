//! Fetch runtime abstraction for Splice.
//!
//! This module defines the `Fetcher` trait that abstracts how remote source
//! text is obtained. The engine only ever asks for "the text behind this URL";
//! whether that comes from HTTP, an in-memory map, or a proxy is up to the
//! implementation.
//!
//! Retry and timeout policy live in [`fetch_text`], not in the implementations,
//! so every fetcher gets the same behavior:
//!
//! ```text
//! fetch_text(url)
//!   ├─ attempt 1 ── timeout(fetcher.fetch(url)) ── ok ──▶ Some(text)
//!   │                      └─ err / timeout ──▶ log, next attempt
//!   ├─ attempt N ── ...
//!   └─ exhausted ──▶ graceful ? None : Err(Exhausted)
//! ```

mod http;
mod memory;

pub use http::HttpFetcher;
pub use memory::MemoryFetcher;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur while fetching remote text
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Network-level failure (DNS, connection refused, TLS, ...)
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// Server answered with a non-success status
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The attempt did not finish within the configured timeout
    #[error("request to {url} timed out after {seconds:.1}s")]
    Timeout { url: String, seconds: f64 },

    /// The response body was empty
    #[error("request to {url} returned no content")]
    Empty { url: String },

    /// Nothing is known about this URL
    #[error("no source registered for {0}")]
    NotFound(String),

    /// Every attempt failed
    #[error("giving up on {url} after {attempts} attempt(s): {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}

/// Retry and timeout policy for [`fetch_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    /// Number of attempts per URL (at least one attempt is always made)
    pub retries: u32,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Return `Ok(None)` instead of an error when every attempt fails
    pub graceful_fail: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            retries: 2,
            timeout: Duration::from_secs(30),
            graceful_fail: false,
        }
    }
}

impl FetchOptions {
    /// Options used for imported files: a missing sibling is not fatal.
    pub fn graceful(mut self) -> Self {
        self.graceful_fail = true;
        self
    }
}

/// Source fetcher trait
///
/// Implementations perform exactly one attempt; retrying and timeouts are
/// handled by [`fetch_text`].
#[async_trait]
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    /// Fetch the text behind `url`
    async fn fetch(&self, url: &str) -> FetchResult<String>;
}

/// Fetch `url` with the retry and timeout policy from `options`.
///
/// Returns `Ok(Some(text))` on success. After all attempts fail, returns
/// `Ok(None)` when `options.graceful_fail` is set and
/// `Err(FetchError::Exhausted)` otherwise.
pub async fn fetch_text(
    fetcher: &dyn Fetcher,
    url: &str,
    options: &FetchOptions,
) -> FetchResult<Option<String>> {
    let attempts = options.retries.max(1);
    let mut last = FetchError::Empty {
        url: url.to_string(),
    };

    for attempt in 1..=attempts {
        let outcome = match tokio::time::timeout(options.timeout, fetcher.fetch(url)).await {
            Ok(Ok(text)) if text.is_empty() => Err(FetchError::Empty {
                url: url.to_string(),
            }),
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                seconds: options.timeout.as_secs_f64(),
            }),
        };

        match outcome {
            Ok(text) => return Ok(Some(text)),
            Err(err) => {
                if options.graceful_fail {
                    info!(url, attempt, error = %err, "fetch attempt failed, moving on");
                } else {
                    warn!(url, attempt, attempts, error = %err, "fetch attempt failed");
                }
                last = err;
            }
        }
    }

    if options.graceful_fail {
        Ok(None)
    } else {
        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts,
            last: Box::new(last),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> FetchOptions {
        FetchOptions {
            retries: 2,
            timeout: Duration::from_millis(50),
            graceful_fail: false,
        }
    }

    #[tokio::test]
    async fn test_fetch_text_returns_content() {
        let fetcher = MemoryFetcher::new().with_file("https://x.test/a.js", "export const a = 1;");
        let text = fetch_text(&fetcher, "https://x.test/a.js", &quick())
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("export const a = 1;"));
    }

    #[tokio::test]
    async fn test_fetch_text_retries_then_succeeds() {
        let fetcher = MemoryFetcher::new()
            .with_file("https://x.test/a.js", "ok")
            .failing_times("https://x.test/a.js", 1);
        let text = fetch_text(&fetcher, "https://x.test/a.js", &quick())
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("ok"));
        assert_eq!(fetcher.request_count("https://x.test/a.js"), 2);
    }

    #[tokio::test]
    async fn test_fetch_text_exhausted_error() {
        let fetcher = MemoryFetcher::new();
        let err = fetch_text(&fetcher, "https://x.test/missing.js", &quick())
            .await
            .unwrap_err();
        match err {
            FetchError::Exhausted { attempts, last, .. } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last, FetchError::NotFound(_)));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
        assert_eq!(fetcher.request_count("https://x.test/missing.js"), 2);
    }

    #[tokio::test]
    async fn test_fetch_text_graceful_returns_none() {
        let fetcher = MemoryFetcher::new();
        let text = fetch_text(&fetcher, "https://x.test/missing.js", &quick().graceful())
            .await
            .unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_fetch_text_times_out() {
        let fetcher = MemoryFetcher::new()
            .with_file("https://x.test/slow.js", "late")
            .stalling("https://x.test/slow.js");
        let err = fetch_text(&fetcher, "https://x.test/slow.js", &quick())
            .await
            .unwrap_err();
        match err {
            FetchError::Exhausted { last, .. } => {
                assert!(matches!(*last, FetchError::Timeout { .. }))
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_a_failure() {
        let fetcher = MemoryFetcher::new().with_file("https://x.test/empty.js", "");
        let text = fetch_text(&fetcher, "https://x.test/empty.js", &quick().graceful())
            .await
            .unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_zero_retries_still_attempts_once() {
        let fetcher = MemoryFetcher::new().with_file("https://x.test/a.js", "ok");
        let options = FetchOptions {
            retries: 0,
            ..quick()
        };
        let text = fetch_text(&fetcher, "https://x.test/a.js", &options).await.unwrap();
        assert_eq!(text.as_deref(), Some("ok"));
        assert_eq!(fetcher.request_count("https://x.test/a.js"), 1);
    }
}
