use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use tracing::debug;

use crate::config::SpliceConfig;
use crate::discovery::ConfigDiscovery;
use crate::error::{ConfigError, Result};

/// Prefix for environment overrides (`SPLICE_FETCH__RETRIES`, `SPLICE_STRICT`, ...).
pub const ENV_PREFIX: &str = "SPLICE_";

/// Values given on the command line. `None` leaves lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub retries: Option<u32>,
    pub timeout_seconds: Option<u64>,
    pub proxy_url: Option<String>,
    pub heading: Option<String>,
    pub strict: Option<bool>,
}

/// Builds a [`SpliceConfig`] from every layer.
///
/// Priority: overrides > environment > config file > defaults.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    search_root: Option<PathBuf>,
    env_prefix: String,
    overrides: ConfigOverrides,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            file: None,
            search_root: None,
            env_prefix: ENV_PREFIX.to_string(),
            overrides: ConfigOverrides::default(),
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file instead of searching for one. It must exist.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Directory searched for a config file (default: current directory).
    pub fn search_root(mut self, root: impl AsRef<Path>) -> Self {
        self.search_root = Some(root.as_ref().to_path_buf());
        self
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// The config file that will be read, if any.
    pub fn config_file(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.clone()));
            }
            return Ok(Some(path.clone()));
        }

        let root = match &self.search_root {
            Some(root) => root.clone(),
            None => match std::env::current_dir() {
                Ok(dir) => dir,
                Err(_) => return Ok(None),
            },
        };
        Ok(ConfigDiscovery::new(root).find())
    }

    /// All layers merged, not yet extracted.
    pub fn figment(&self) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(SpliceConfig::default()));

        if let Some(path) = self.config_file()? {
            debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(&self.env_prefix).split("__"));

        let overrides = &self.overrides;
        if let Some(retries) = overrides.retries {
            figment = figment.merge(Serialized::default("fetch.retries", retries));
        }
        if let Some(timeout) = overrides.timeout_seconds {
            figment = figment.merge(Serialized::default("fetch.timeout_seconds", timeout));
        }
        if let Some(proxy) = &overrides.proxy_url {
            figment = figment.merge(Serialized::default("fetch.proxy_url", proxy));
        }
        if let Some(heading) = &overrides.heading {
            figment = figment.merge(Serialized::default("output.heading", heading));
        }
        if let Some(strict) = overrides.strict {
            figment = figment.merge(Serialized::default("strict", strict));
        }

        Ok(figment)
    }

    /// Merge, extract and validate.
    pub fn load(&self) -> Result<SpliceConfig> {
        let config: SpliceConfig = self
            .figment()?
            .extract()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
