//! Command-line interface definition for splice.
//!
//! # Command Structure
//!
//! - `splice inline <REFERENCE>` - inline a file or repository and print the block
//! - `splice sync <NOTE>` - inline the note's `repo:`/`entry:` reference into its code block
//! - `splice config` - print the effective configuration

mod commands;
mod tests;

use std::path::PathBuf;

use clap::Parser;
use splice_config::ConfigOverrides;

pub use commands::{Command, ConfigArgs, InlineArgs, SyncArgs};

/// splice - flatten a plugin's imports into one code block
#[derive(Parser, Debug)]
#[command(
    name = "splice",
    version,
    about = "Inline a remote plugin's imported functions into one code block",
    long_about = "splice fetches a plugin entry file, inlines every function it imports\n\
                  (transitively) under collision-free names, and prints the result or\n\
                  writes it into a markdown note's code block."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to splice.toml
    ///
    /// If not provided, searches for splice.toml or .splice.toml in the
    /// current directory.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fetch attempts per URL
    #[arg(long, global = true, value_name = "N")]
    pub retries: Option<u32>,

    /// Per-attempt fetch timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Route requests through a proxy that takes the target as `?apiurl=`
    #[arg(long, global = true, value_name = "URL")]
    pub proxy: Option<String>,

    /// Fail when any import cannot be fetched
    #[arg(long, global = true)]
    pub strict: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub config: Option<PathBuf>,
    pub retries: Option<u32>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub strict: bool,
}

impl GlobalOptions {
    /// Command-line layer for the config loader.
    pub fn overrides(&self, heading: Option<String>) -> ConfigOverrides {
        ConfigOverrides {
            retries: self.retries,
            timeout_seconds: self.timeout,
            proxy_url: self.proxy.clone(),
            heading,
            strict: self.strict.then_some(true),
        }
    }
}

impl Cli {
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            quiet: self.quiet,
            config: self.config.clone(),
            retries: self.retries,
            timeout: self.timeout,
            proxy: self.proxy.clone(),
            strict: self.strict,
        }
    }
}
