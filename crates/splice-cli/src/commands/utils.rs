//! Shared pieces for command implementations: config loading, conversion
//! into library types, and the resolve-then-inline pipeline.

use std::sync::Arc;
use std::time::Duration;

use splice::{
    EntryPoint, EntryResolver, EntrySettings, FetchOptions, Fetcher, HttpFetcher, InlineOptions,
    InlineOutput, Inliner, SourceReference,
};
use splice_config::{ConfigLoader, SpliceConfig};
use tracing::debug;

use crate::cli::GlobalOptions;
use crate::error::{CliError, Result};

/// Load configuration with the command line as the top layer.
pub fn load_config(global: &GlobalOptions, heading: Option<String>) -> Result<SpliceConfig> {
    let mut loader = ConfigLoader::new().overrides(global.overrides(heading));
    if let Some(path) = &global.config {
        loader = loader.file(path);
    }
    let config = loader.load()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

pub fn fetch_options(config: &SpliceConfig) -> FetchOptions {
    FetchOptions {
        retries: config.fetch.retries,
        timeout: Duration::from_secs(config.fetch.timeout_seconds),
        graceful_fail: false,
    }
}

pub fn entry_settings(config: &SpliceConfig) -> EntrySettings {
    EntrySettings {
        host: config.entry.host.clone(),
        default_branch: config.entry.default_branch.clone(),
        locations: config.entry.locations.clone(),
    }
}

pub fn inline_options(config: &SpliceConfig) -> InlineOptions {
    InlineOptions {
        fetch: fetch_options(config),
        strict: config.strict,
    }
}

/// The HTTP fetcher, routed through the configured proxy if there is one.
pub fn http_fetcher(config: &SpliceConfig) -> Arc<dyn Fetcher> {
    let fetcher = HttpFetcher::new();
    match &config.fetch.proxy_url {
        Some(proxy) => Arc::new(fetcher.with_proxy(proxy.clone())),
        None => Arc::new(fetcher),
    }
}

/// Resolve `reference` to its entry file and inline everything it imports.
pub async fn inline_reference(
    reference: &SourceReference,
    config: &SpliceConfig,
    fetcher: Arc<dyn Fetcher>,
) -> Result<(EntryPoint, InlineOutput)> {
    let entry = EntryResolver::new(fetcher.clone())
        .with_settings(entry_settings(config))
        .with_fetch_options(fetch_options(config))
        .resolve(reference)
        .await?;

    let output = Inliner::new(fetcher)
        .with_options(inline_options(config))
        .run(&entry)
        .await?
        .ok_or_else(|| CliError::EmptyEntry(entry.url.clone()))?;

    Ok((entry, output))
}
