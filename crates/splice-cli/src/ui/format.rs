//! Formatting for durations and run summaries.

use std::time::Duration;

use owo_colors::OwoColorize;
use splice::{InlineOutput, SkipReason};

use super::{color_enabled, warning};

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use splice_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One line per skipped import, then a totals line, all on stderr.
pub fn print_inline_summary(output: &InlineOutput, elapsed: Duration) {
    for skipped in &output.skipped {
        let reason = match skipped.reason {
            SkipReason::AlreadyInlined => "already inlined",
            SkipReason::FetchFailed => "could not be fetched",
        };
        let line = format!("  skipped {} ({reason})", skipped.url);
        if color_enabled() {
            eprintln!("{}", line.dimmed());
        } else {
            eprintln!("{line}");
        }
    }

    let files = output
        .translations
        .iter()
        .map(|t| t.source_url.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    let totals = format!(
        "{} function(s) from {} file(s), {} characters in {}",
        output.translations.len(),
        files,
        output.code.chars().count(),
        format_duration(elapsed)
    );
    if color_enabled() {
        eprintln!("  {} {}", "Inlined".bold(), totals.green());
    } else {
        eprintln!("  Inlined {totals}");
    }

    let failed = output
        .skipped
        .iter()
        .filter(|s| s.reason == SkipReason::FetchFailed)
        .count();
    if failed > 0 {
        warning(&format!(
            "{failed} import(s) could not be fetched; calls into them were left as-is"
        ));
    }
}
