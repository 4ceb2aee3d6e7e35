use crate::config::SpliceConfig;
use crate::error::{ConfigError, Result};

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

impl SpliceConfig {
    /// Check values the types alone cannot rule out.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.retries == 0 {
            return Err(invalid("fetch.retries", "at least one attempt is required"));
        }
        if self.fetch.timeout_seconds == 0 {
            return Err(invalid("fetch.timeout_seconds", "must be greater than zero"));
        }
        if let Some(proxy) = &self.fetch.proxy_url {
            if !is_http_url(proxy) {
                return Err(invalid("fetch.proxy_url", format!("'{proxy}' is not an http(s) URL")));
            }
        }
        if !is_http_url(&self.entry.host) {
            return Err(invalid(
                "entry.host",
                format!("'{}' is not an http(s) URL", self.entry.host),
            ));
        }
        if self.entry.default_branch.trim().is_empty() {
            return Err(invalid("entry.default_branch", "must not be empty"));
        }
        if self.entry.locations.is_empty() {
            return Err(invalid("entry.locations", "at least one location is required"));
        }
        if let Some(location) = self.entry.locations.iter().find(|l| l.trim().is_empty()) {
            return Err(invalid("entry.locations", format!("'{location}' is not a path")));
        }
        if self.output.max_chars == 0 {
            return Err(invalid("output.max_chars", "must be greater than zero"));
        }
        Ok(())
    }
}
