//! HTTP `Fetcher` implementation.
//!
//! Fetches source text from a hosted file viewer. The viewer's "blob" pages
//! answer `Accept: application/json` requests with a JSON payload whose
//! `payload.blob.rawLines` holds the file line by line; raw URLs answer with
//! the file itself. Both shapes are handled here so callers never see the
//! difference.
//!
//! ```text
//! HttpFetcher.fetch(url)
//!   ├─ proxy configured? ── GET {proxy}?apiurl={url}
//!   └─ otherwise ────────── GET {url}
//!         ├─ non-2xx ───────▶ FetchError::Status
//!         ├─ JSON w/ rawLines ▶ lines.join("\n")
//!         └─ anything else ──▶ body verbatim
//! ```

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use super::{FetchError, FetchResult, Fetcher};

/// Fetcher that performs real HTTP requests with `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
    proxy_url: Option<String>,
}

impl HttpFetcher {
    /// Create a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route every request through `proxy_url`, passing the target URL as the
    /// `apiurl` query parameter.
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = match &self.proxy_url {
            Some(proxy) => self.client.get(proxy).query(&[("apiurl", url)]),
            None => self.client.get(url),
        };
        builder.header(ACCEPT, "application/json, text/plain;q=0.9, */*;q=0.8")
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        debug!(url, proxied = self.proxy_url.is_some(), "GET");

        let response = self
            .request(url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(decode_body(body))
    }
}

#[derive(Deserialize)]
struct BlobResponse {
    payload: BlobPayload,
}

#[derive(Deserialize)]
struct BlobPayload {
    blob: Blob,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    raw_lines: Vec<String>,
}

/// Unwrap a file-viewer JSON payload into file text; pass anything else through.
pub(crate) fn decode_body(body: String) -> String {
    if !body.trim_start().starts_with('{') {
        return body;
    }
    match serde_json::from_str::<BlobResponse>(&body) {
        Ok(blob) => blob.payload.blob.raw_lines.join("\n"),
        Err(_) => body,
    }
}
