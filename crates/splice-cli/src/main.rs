//! splice - inline a remote plugin's imports into one code block.

use clap::Parser;
use miette::Result;
use splice_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let global = args.global_options();
    let result = match args.command {
        cli::Command::Inline(inline_args) => commands::inline_execute(inline_args, &global).await,
        cli::Command::Sync(sync_args) => commands::sync_execute(sync_args, &global).await,
        cli::Command::Config(config_args) => commands::config_execute(config_args, &global).await,
    };

    result.map_err(error::cli_error_to_miette)
}
