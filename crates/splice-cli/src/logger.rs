//! Logging setup for the splice CLI.
//!
//! Logs go to stderr so `splice inline` can print the code block on stdout.
//!
//! The filter is chosen in this order:
//! 1. `--verbose`: debug for splice crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. info for splice crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "splice=debug,splice_config=debug,splice_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "splice=info,splice_config=info,splice_cli=info";

/// The filter directive string for the given flags.
pub fn filter_directives(verbose: bool, quiet: bool) -> Option<&'static str> {
    if verbose {
        Some(VERBOSE_FILTER)
    } else if quiet {
        Some(QUIET_FILTER)
    } else {
        None
    }
}

/// Initialize the tracing subscriber. Call once, before any logging.
///
/// ```rust,no_run
/// use splice_cli::logger::init_logger;
///
/// init_logger(true, false, false);
/// tracing::debug!(url = "https://example.com/plugin.js", "probing");
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = match filter_directives(verbose, quiet) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
