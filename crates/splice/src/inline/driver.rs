//! Import graph traversal.
//!
//! Walks the import graph depth first, starting at the entry file. Each
//! imported file is fetched once, all of its declarations are inlined into
//! the shared buffer, and then its own imports are walked before the next
//! sibling import of its parent. The traversal keeps an explicit stack of
//! files whose imports are still pending instead of recursing.

use std::collections::VecDeque;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::declarations::extract_declarations;
use super::error::{InlineError, InlineResult};
use super::imports::{ImportReference, parse_imports, strip_imports};
use super::rewrite::{
    CodeBlockBuffer, FunctionTranslation, ImportScopes, TranslationTable, inline_file,
};
use crate::entry::EntryPoint;
use crate::runtime::{FetchOptions, Fetcher, fetch_text};

static TRAILING_DEFAULT_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+default\s+[A-Za-z_$][\w$]*[ \t]*;?\s*\z")
        .expect("default export pattern is valid")
});

/// Options for one inlining run.
#[derive(Debug, Clone, Default)]
pub struct InlineOptions {
    /// Retry and timeout policy for every fetched import
    pub fetch: FetchOptions,
    /// Fail the run when an import cannot be fetched instead of skipping it
    pub strict: bool,
}

/// Why an import reference was not inlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The resolved URL was inlined earlier in this run (cycle or diamond)
    AlreadyInlined,
    /// Every fetch attempt failed
    FetchFailed,
}

/// An import reference the run passed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedImport {
    pub url: String,
    pub importer: String,
    pub reason: SkipReason,
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct InlineOutput {
    /// The flattened code block
    pub code: String,
    /// Every translation made, in inlining order
    pub translations: Vec<FunctionTranslation>,
    /// Imports that were not inlined
    pub skipped: Vec<SkippedImport>,
}

/// The initial buffer for `content`: its import statements and a trailing
/// `export default <name>;` removed, trimmed.
pub fn entry_object_body(content: &str) -> String {
    let without_imports = strip_imports(content);
    TRAILING_DEFAULT_EXPORT
        .replace(&without_imports, "")
        .trim()
        .to_string()
}

/// A file whose imports are still being walked.
struct PendingFile {
    url: String,
    imports: VecDeque<ImportReference>,
}

impl PendingFile {
    /// Parse the imports of `content` and bind them in `scopes`.
    fn new(content: &str, url: &str, scopes: &mut ImportScopes) -> Self {
        let imports = parse_imports(content, url);
        scopes.record(url, &imports);
        Self {
            url: url.to_string(),
            imports: imports.into(),
        }
    }
}

/// Import-inlining engine.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use splice::{EntryPoint, HttpFetcher, Inliner};
///
/// # async fn demo() -> Result<(), splice::InlineError> {
/// let inliner = Inliner::new(Arc::new(HttpFetcher::new()));
/// let entry = EntryPoint::new("const plugin = {}", "https://github.com/org/repo/blob/main/plugin.js");
/// if let Some(output) = inliner.run(&entry).await? {
///     println!("{}", output.code);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Inliner {
    fetcher: Arc<dyn Fetcher>,
    options: InlineOptions,
}

impl Inliner {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            options: InlineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: InlineOptions) -> Self {
        self.options = options;
        self
    }

    /// Inline everything `entry` transitively imports.
    ///
    /// Returns `Ok(None)` when the entry has no content. Imports that cannot
    /// be fetched are skipped (only their own subtree is lost) unless the
    /// run is strict.
    pub async fn run(&self, entry: &EntryPoint) -> InlineResult<Option<InlineOutput>> {
        let Some(content) = entry.content.as_deref().filter(|c| !c.trim().is_empty()) else {
            warn!(url = %entry.url, "entry has no content, nothing to inline");
            return Ok(None);
        };

        let mut buffer = CodeBlockBuffer::new(entry_object_body(content), entry.url.clone());
        let mut translations = TranslationTable::new();
        let mut scopes = ImportScopes::new();
        let mut skipped = Vec::new();
        let mut visited = FxHashSet::default();
        let mut failed = FxHashSet::default();

        visited.insert(entry.url.clone());
        let mut stack = vec![PendingFile::new(content, &entry.url, &mut scopes)];

        if !stack[0].imports.is_empty() {
            buffer.final_brace()?;
        }

        let fetch_options = if self.options.strict {
            self.options.fetch.clone()
        } else {
            self.options.fetch.clone().graceful()
        };

        while let Some(file) = stack.last_mut() {
            let Some(import) = file.imports.pop_front() else {
                stack.pop();
                continue;
            };
            let importer = file.url.clone();
            let url = import.resolved_url;

            if visited.contains(&url) || failed.contains(&url) {
                let reason = if failed.contains(&url) {
                    SkipReason::FetchFailed
                } else {
                    SkipReason::AlreadyInlined
                };
                info!(url = %url, importer = %importer, ?reason, "skipping import");
                skipped.push(SkippedImport {
                    url,
                    importer,
                    reason,
                });
                continue;
            }

            let text = match fetch_text(self.fetcher.as_ref(), &url, &fetch_options).await {
                Ok(Some(text)) => text,
                Ok(None) => {
                    warn!(url = %url, importer = %importer, "import could not be fetched, skipping its subtree");
                    failed.insert(url.clone());
                    skipped.push(SkippedImport {
                        url,
                        importer,
                        reason: SkipReason::FetchFailed,
                    });
                    continue;
                }
                Err(source) => {
                    return Err(InlineError::ImportUnavailable {
                        url,
                        importer,
                        source: Some(source),
                    });
                }
            };
            visited.insert(url.clone());

            let declarations = extract_declarations(&text);
            if declarations.is_empty() {
                debug!(url = %url, "no declarations found");
            }
            let pending = PendingFile::new(&text, &url, &mut scopes);
            let count = inline_file(&url, &declarations, &mut buffer, &mut translations, &scopes)?;
            info!(url = %url, importer = %importer, count, "inlined file");

            stack.push(pending);
        }

        info!(
            url = %entry.url,
            translations = translations.len(),
            skipped = skipped.len(),
            "inlining complete"
        );

        Ok(Some(InlineOutput {
            code: buffer.into_string(),
            translations: translations.into_vec(),
            skipped,
        }))
    }
}
