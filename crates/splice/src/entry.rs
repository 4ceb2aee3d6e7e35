//! Entry point resolution.
//!
//! Turns a repository or file reference into the text of a concrete entry
//! file. A repository is probed at a fixed list of conventional locations on
//! the default branch; the first location that fetches wins.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::runtime::{FetchError, FetchOptions, Fetcher, fetch_text};

/// Errors from entry resolution
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// None of the candidate locations produced any text
    #[error("no entry file found for {reference} (tried {count} location(s))", count = .tried.len())]
    NotFound {
        reference: String,
        tried: Vec<String>,
    },

    /// The reference is neither `org/repo`, `org/repo/path`, nor a URL
    #[error("'{0}' is not a repository or file reference")]
    InvalidReference(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// One fetched source file.
///
/// `content` is `None` when the file could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub content: Option<String>,
    pub url: String,
}

impl EntryPoint {
    pub fn new(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            url: url.into(),
        }
    }

    /// An entry whose fetch failed.
    pub fn missing(url: impl Into<String>) -> Self {
        Self {
            content: None,
            url: url.into(),
        }
    }
}

/// What a document or command line points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceReference {
    /// A whole repository; the entry file is discovered by probing
    Repository {
        organization: String,
        repository: String,
    },
    /// One file, as an absolute URL or `org/repo/path`
    File { url: String },
}

impl SourceReference {
    pub fn repository(organization: impl Into<String>, repository: impl Into<String>) -> Self {
        Self::Repository {
            organization: organization.into(),
            repository: repository.into(),
        }
    }

    pub fn file(url: impl Into<String>) -> Self {
        Self::File { url: url.into() }
    }

    /// Parse `org/repo`, `org/repo/path/to/file.js`, or a URL.
    ///
    /// A URL whose path has exactly two segments names a repository; any
    /// other URL names a file.
    pub fn parse(reference: &str) -> Result<Self, EntryError> {
        let trimmed = reference.trim().trim_end_matches('/');
        let invalid = || EntryError::InvalidReference(reference.trim().to_string());

        if let Some(rest) = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
        {
            let path: Vec<&str> = rest.split('/').skip(1).filter(|s| !s.is_empty()).collect();
            return match path.as_slice() {
                [] | [_] => Err(invalid()),
                [organization, repository] => Ok(Self::repository(*organization, *repository)),
                _ => Ok(Self::file(trimmed)),
            };
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.iter().any(|s| s.is_empty() || s.contains(char::is_whitespace)) {
            return Err(invalid());
        }
        match segments.as_slice() {
            [organization, repository] => Ok(Self::repository(*organization, *repository)),
            [_, _, _, ..] => Ok(Self::file(trimmed)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository {
                organization,
                repository,
            } => write!(f, "{organization}/{repository}"),
            Self::File { url } => f.write_str(url),
        }
    }
}

/// Where and how to look for entry files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySettings {
    pub host: String,
    pub default_branch: String,
    /// Candidate entry paths relative to the repository root, in probe order
    pub locations: Vec<String>,
}

impl Default for EntrySettings {
    fn default() -> Self {
        Self {
            host: "https://github.com".to_string(),
            default_branch: "main".to_string(),
            locations: vec![
                "lib/plugin.js".to_string(),
                "plugin.js".to_string(),
                "index.js".to_string(),
            ],
        }
    }
}

/// Resolves a [`SourceReference`] to a fetched [`EntryPoint`].
#[derive(Debug, Clone)]
pub struct EntryResolver {
    fetcher: Arc<dyn Fetcher>,
    settings: EntrySettings,
    fetch: FetchOptions,
}

impl EntryResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            settings: EntrySettings::default(),
            fetch: FetchOptions::default(),
        }
    }

    pub fn with_settings(mut self, settings: EntrySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_fetch_options(mut self, fetch: FetchOptions) -> Self {
        self.fetch = fetch;
        self
    }

    /// URLs probed for `reference`, in order.
    pub fn candidates(&self, reference: &SourceReference) -> Result<Vec<String>, EntryError> {
        let host = self.settings.host.trim_end_matches('/');
        let branch = &self.settings.default_branch;
        match reference {
            SourceReference::Repository {
                organization,
                repository,
            } => Ok(self
                .settings
                .locations
                .iter()
                .map(|location| {
                    format!(
                        "{host}/{organization}/{repository}/blob/{branch}/{}",
                        location.trim_start_matches('/')
                    )
                })
                .collect()),
            SourceReference::File { url } => {
                if url.starts_with("https://") || url.starts_with("http://") {
                    return Ok(vec![url.clone()]);
                }
                let mut parts = url.trim_start_matches('/').splitn(3, '/');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(organization), Some(repository), Some(path)) if !path.is_empty() => {
                        Ok(vec![format!(
                            "{host}/{organization}/{repository}/blob/{branch}/{path}"
                        )])
                    }
                    _ => Err(EntryError::InvalidReference(url.clone())),
                }
            }
        }
    }

    /// Fetch the first candidate for `reference` that has content.
    pub async fn resolve(&self, reference: &SourceReference) -> Result<EntryPoint, EntryError> {
        let candidates = self.candidates(reference)?;
        let options = self.fetch.clone().graceful();

        for url in &candidates {
            debug!(url = %url, "probing entry candidate");
            if let Some(content) = fetch_text(self.fetcher.as_ref(), url, &options).await? {
                info!(reference = %reference, url = %url, "resolved entry file");
                return Ok(EntryPoint::new(content, url.clone()));
            }
        }

        Err(EntryError::NotFound {
            reference: reference.to_string(),
            tried: candidates,
        })
    }
}
