//! Error types for the inlining engine.

use crate::runtime::FetchError;

/// Result type for inlining operations
pub type InlineResult<T> = Result<T, InlineError>;

/// Errors that abort an inlining run.
///
/// Recoverable conditions (an import that cannot be fetched, a declaration
/// without a reachable end line, an import that was already inlined) are
/// logged and skipped instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum InlineError {
    /// The output buffer has no closing brace to splice declarations before
    #[error("code block from {url} has no closing brace to insert inlined functions before")]
    MissingClosingBrace { url: String },

    /// An import could not be fetched and the run is strict
    #[error("could not fetch {url} (imported from {importer})")]
    ImportUnavailable {
        url: String,
        importer: String,
        #[source]
        source: Option<FetchError>,
    },
}
