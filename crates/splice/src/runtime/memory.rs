//! In-memory `Fetcher` implementation.
//!
//! Serves source text from a URL → text map. Used by tests across the
//! workspace and by callers that already hold the files they want to inline.

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{FetchError, FetchResult, Fetcher};

/// Fetcher backed by a map of URL → file text.
///
/// Every requested URL is recorded, so tests can assert on fetch order and
/// retry counts. Individual URLs can be told to fail a number of times, fail
/// forever (by not registering them), or never answer.
///
/// # Example
///
/// ```rust
/// use splice::runtime::{Fetcher, MemoryFetcher};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let fetcher = MemoryFetcher::new().with_file("https://example.com/a.js", "export const a = 1;");
/// assert_eq!(fetcher.fetch("https://example.com/a.js").await.unwrap(), "export const a = 1;");
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    files: FxHashMap<String, String>,
    stalled: FxHashSet<String>,
    failures: Mutex<FxHashMap<String, u32>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the text served for `url`.
    pub fn with_file(mut self, url: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(url.into(), content.into());
        self
    }

    /// Make the first `times` requests for `url` fail with a network error.
    pub fn failing_times(self, url: impl Into<String>, times: u32) -> Self {
        self.failures.lock().insert(url.into(), times);
        self
    }

    /// Make every request for `url` hang until the caller's timeout fires.
    pub fn stalling(mut self, url: impl Into<String>) -> Self {
        self.stalled.insert(url.into());
        self
    }

    /// Every URL requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// How many times `url` was requested.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.lock().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.requests.lock().push(url.to_string());

        if self.stalled.contains(url) {
            std::future::pending::<()>().await;
        }

        {
            let mut failures = self.failures.lock();
            if let Some(remaining) = failures.get_mut(url) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(FetchError::Network {
                        url: url.to_string(),
                        reason: "injected failure".to_string(),
                    });
                }
            }
        }

        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}
