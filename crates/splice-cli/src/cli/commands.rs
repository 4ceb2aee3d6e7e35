use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Available splice subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inline a plugin and print the resulting code block
    ///
    /// REFERENCE is `org/repo` (the entry file is discovered), a file
    /// reference `org/repo/path/to/plugin.js`, or a full URL.
    ///
    /// Examples:
    ///   splice inline alloy-org/plugin-builder
    ///   splice inline https://github.com/org/repo/blob/main/lib/plugin.js -o plugin.js
    Inline(InlineArgs),

    /// Sync a markdown note's code block from the source it names
    ///
    /// The note names its source with a `repo: org/repo` or
    /// `entry: <file reference>` line. The code block under the configured
    /// heading (or the first code block) is replaced.
    Sync(SyncArgs),

    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

/// Arguments for the inline command
#[derive(Args, Debug, Clone)]
pub struct InlineArgs {
    /// Repository or file reference to inline
    #[arg(value_name = "REFERENCE")]
    pub reference: String,

    /// Write the code block to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print a JSON report (code, translations, skipped imports)
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

/// Arguments for the sync command
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Markdown note to update
    #[arg(value_name = "NOTE")]
    pub note: PathBuf,

    /// Heading whose code block receives the output
    #[arg(long, value_name = "TEXT")]
    pub heading: Option<String>,

    /// Show what would be written without touching the note
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the config command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Also print which config file was used
    #[arg(long)]
    pub show_source: bool,
}
