//! Miette diagnostic conversion for CLI errors.

use miette::Report;
use splice::{DocumentError, EntryError, InlineError};

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Entry(e) => entry_error_to_miette(e),
        CliError::Inline(e) => inline_error_to_miette(e),
        CliError::Document(e) => document_error_to_miette(e),
        CliError::Config(e) => miette::miette!(
            "Configuration error: {}\n\nHint: Check splice.toml and SPLICE_* environment variables",
            e
        ),
        _ => miette::miette!("{}", err),
    }
}

fn entry_error_to_miette(err: EntryError) -> Report {
    match err {
        EntryError::NotFound { reference, tried } => miette::miette!(
            "No entry file found for {}\nTried:\n  {}\n\nHint: Set entry.locations in splice.toml or point at the file with an `entry:` line",
            reference,
            tried.join("\n  ")
        ),
        other => miette::miette!("{}", other),
    }
}

fn inline_error_to_miette(err: InlineError) -> Report {
    match err {
        InlineError::MissingClosingBrace { url } => miette::miette!(
            "The entry file {} has no closing brace to insert inlined functions before\n\nHint: The entry must define its plugin as an object literal, e.g. `const plugin = {{ ... }}`",
            url
        ),
        InlineError::ImportUnavailable {
            url,
            importer,
            source,
        } => {
            let reason = source.map(|e| e.to_string()).unwrap_or_default();
            miette::miette!(
                "Could not fetch {}\nImported from: {}\n{}\n\nHint: Drop --strict to skip unavailable imports",
                url,
                importer,
                reason
            )
        }
        other => miette::miette!("{}", other),
    }
}

fn document_error_to_miette(err: DocumentError) -> Report {
    match err {
        DocumentError::OutputTooLarge { chars, max } => miette::miette!(
            "Inlined code is {} characters, over the {} character limit; the note was not changed\n\nHint: Raise output.max_chars in splice.toml",
            chars,
            max
        ),
        DocumentError::NoSourceReference => miette::miette!(
            "{}\n\nHint: Add a line like `repo: org/repo` or `entry: org/repo/lib/plugin.js`",
            err
        ),
        DocumentError::NoInsertLocation => miette::miette!(
            "{}\n\nHint: Add an empty ```javascript fenced block where the code should go",
            err
        ),
    }
}
