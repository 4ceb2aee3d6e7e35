//! Inline command implementation.

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use splice::{DocumentError, Fetcher, SourceReference};
use splice_config::SpliceConfig;
use tracing::info;

use crate::cli::{GlobalOptions, InlineArgs};
use crate::commands::utils;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Execute the inline command against the network.
pub async fn execute(args: InlineArgs, global: &GlobalOptions) -> Result<()> {
    let config = utils::load_config(global, None)?;
    let fetcher = utils::http_fetcher(&config);
    run(&args, &config, fetcher, global.quiet).await
}

/// Inline `args.reference` with `fetcher` and print or write the block.
pub async fn run(
    args: &InlineArgs,
    config: &SpliceConfig,
    fetcher: Arc<dyn Fetcher>,
    quiet: bool,
) -> Result<()> {
    let reference = SourceReference::parse(&args.reference)?;
    let started = Instant::now();

    let (entry, output) = utils::inline_reference(&reference, config, fetcher).await?;

    let chars = output.code.chars().count();
    if chars > config.output.max_chars {
        return Err(DocumentError::OutputTooLarge {
            chars,
            max: config.output.max_chars,
        }
        .into());
    }

    if args.json {
        let report = json!({
            "entry": entry.url,
            "code": output.code,
            "translations": output.translations,
            "skipped": output.skipped,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(path) = &args.output {
        tokio::fs::write(path, format!("{}\n", output.code))
            .await
            .with_path(path)?;
        info!(path = %path.display(), "wrote code block");
        if !quiet {
            ui::success(&format!("Wrote {}", path.display()));
        }
    } else {
        println!("{}", output.code);
    }

    if !quiet {
        ui::print_inline_summary(&output, started.elapsed());
    }
    Ok(())
}
