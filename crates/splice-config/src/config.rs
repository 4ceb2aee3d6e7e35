use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Complete splice configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SpliceConfig {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub entry: EntryConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Fail a run when an import cannot be fetched instead of skipping it
    #[serde(default)]
    pub strict: bool,
}

/// Network fetch policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// Attempts per URL
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Per-attempt timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Proxy that receives the target URL as its `apiurl` query parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            timeout_seconds: default_timeout_seconds(),
            proxy_url: None,
        }
    }
}

/// Entry file discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Candidate entry paths, probed in order
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            default_branch: default_branch(),
            locations: default_locations(),
        }
    }
}

/// Where and how much output is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Upper bound on the written code block, in characters
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Heading whose code block receives the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            heading: None,
        }
    }
}

impl SpliceConfig {
    /// Render as TOML, in the same shape `splice.toml` is read in.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
