//! # splice
//!
//! Fetch a remote source file, inline the declarations it imports, and get
//! back one self-contained code block.
//!
//! There is no parser involved: imports are found by pattern, declarations
//! are cut out by a line-anchored boundary scan, and call sites are rewritten
//! by identifier-aware text replacement. The output is best effort and is
//! not validated as JavaScript.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use splice::{EntryResolver, HttpFetcher, Inliner, SourceReference};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Arc::new(HttpFetcher::new());
//! let entry = EntryResolver::new(fetcher.clone())
//!     .resolve(&SourceReference::repository("alloy-org", "plugin-builder"))
//!     .await?;
//!
//! if let Some(output) = Inliner::new(fetcher).run(&entry).await? {
//!     println!("{}", output.code);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`runtime`]: the [`Fetcher`] seam plus retry and timeout policy
//! - [`entry`]: repository and file references, entry file discovery
//! - [`inline`]: the import-inlining engine
//! - [`document`]: reading references from and writing code into notes

pub mod document;
pub mod entry;
pub mod inline;
pub mod runtime;

pub use document::{CodeBlockRange, Document, DocumentError, Provenance};
pub use entry::{EntryError, EntryPoint, EntryResolver, EntrySettings, SourceReference};
pub use inline::{
    CodeBlockBuffer, FunctionTranslation, ImportScopes, InlineError, InlineOptions, InlineOutput,
    InlineResult, Inliner, SkipReason, SkippedImport,
};
pub use runtime::{
    FetchError, FetchOptions, FetchResult, Fetcher, HttpFetcher, MemoryFetcher, fetch_text,
};
