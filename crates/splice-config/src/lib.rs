//! Configuration for splice.
//!
//! Settings are layered, later layers winning:
//!
//! ```text
//! defaults → splice.toml → SPLICE_* environment → command-line overrides
//! ```
//!
//! Environment keys nest with a double underscore, so `SPLICE_FETCH__RETRIES=3`
//! sets `fetch.retries`.

pub mod config;
pub mod defaults;
pub mod discovery;
pub mod error;
pub mod loading;
pub mod validation;

pub use config::{EntryConfig, FetchConfig, OutputConfig, SpliceConfig};
pub use discovery::{CONFIG_FILE_NAMES, ConfigDiscovery};
pub use error::{ConfigError, Result};
pub use loading::{ConfigLoader, ConfigOverrides, ENV_PREFIX};
