//! Config file discovery.

use std::path::{Path, PathBuf};

/// File names searched for, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["splice.toml", ".splice.toml"];

/// Finds a config file in a directory.
///
/// # Example
///
/// ```no_run
/// use splice_config::ConfigDiscovery;
///
/// if let Some(path) = ConfigDiscovery::new(".").find() {
///     println!("using {}", path.display());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The first of [`CONFIG_FILE_NAMES`] present in the root directory.
    pub fn find(&self) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }
}
