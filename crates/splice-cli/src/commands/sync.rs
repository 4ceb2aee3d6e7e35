//! Sync command implementation.
//!
//! Reads a note, resolves the reference it names, inlines it, and writes the
//! result into the note's code block. Nothing is written unless the whole
//! pipeline succeeds.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use splice::{Document, Fetcher, InlineOutput, Provenance};
use splice_config::SpliceConfig;
use tracing::info;

use crate::cli::{GlobalOptions, SyncArgs};
use crate::commands::utils;
use crate::error::{Result, ResultExt};
use crate::ui;

/// What a sync produced.
#[derive(Debug)]
pub struct SyncOutcome {
    pub note: PathBuf,
    /// Full note text after the sync
    pub updated: String,
    /// Whether the note on disk was rewritten
    pub written: bool,
    pub output: InlineOutput,
}

/// Execute the sync command against the network.
pub async fn execute(args: SyncArgs, global: &GlobalOptions) -> Result<()> {
    let config = utils::load_config(global, args.heading.clone())?;
    let fetcher = utils::http_fetcher(&config);
    let started = Instant::now();

    let outcome = run(&args, &config, fetcher).await?;

    if args.dry_run {
        print!("{}", outcome.updated);
    }
    if !global.quiet {
        ui::print_inline_summary(&outcome.output, started.elapsed());
        if outcome.written {
            ui::success(&format!("Synced {}", outcome.note.display()));
        } else {
            ui::info("Dry run, note not changed");
        }
    }
    Ok(())
}

/// Sync `args.note` using `fetcher`.
pub async fn run(
    args: &SyncArgs,
    config: &SpliceConfig,
    fetcher: Arc<dyn Fetcher>,
) -> Result<SyncOutcome> {
    let text = tokio::fs::read_to_string(&args.note)
        .await
        .with_path(&args.note)?;
    let document = Document::parse(text);

    let reference = document.source_reference()?;
    let range = document.insert_range(config.output.heading.as_deref())?;
    info!(note = %args.note.display(), reference = %reference, "syncing note");

    let (entry, output) = utils::inline_reference(&reference, config, fetcher).await?;
    info!(entry = %entry.url, "entry resolved");

    let provenance = Provenance::now(reference.to_string());
    let updated =
        document.replace_code_block(&range, &output.code, &provenance, config.output.max_chars)?;

    let written = !args.dry_run;
    if written {
        tokio::fs::write(&args.note, &updated)
            .await
            .with_path(&args.note)?;
    }

    Ok(SyncOutcome {
        note: args.note.clone(),
        updated,
        written,
        output,
    })
}
