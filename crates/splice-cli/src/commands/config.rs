//! Config command implementation.

use splice_config::ConfigLoader;

use crate::cli::{ConfigArgs, GlobalOptions};
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Print the effective configuration as TOML on stdout.
pub async fn execute(args: ConfigArgs, global: &GlobalOptions) -> Result<()> {
    let config = utils::load_config(global, None)?;

    if args.show_source {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &global.config {
            loader = loader.file(path);
        }
        match loader.config_file()? {
            Some(path) => ui::info(&format!("Config file: {}", path.display())),
            None => ui::info("No config file found, using defaults and environment"),
        }
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
