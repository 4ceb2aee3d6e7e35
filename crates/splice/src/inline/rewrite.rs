//! Renaming inlined declarations and rewriting their call sites.
//!
//! Every inlined declaration gets a name derived from the file it came from,
//! `_inlined_<file>_<name>`, and is spliced into the output buffer as a
//! member of the entry object, immediately before the buffer's final closing
//! brace. After each splice, free uses of the original names anywhere in the
//! buffer are routed through `this.<new name>`.
//!
//! The buffer remembers which file each inserted member came from. A use is
//! resolved in that file: its own declarations first, then the names it
//! imports (see [`ImportScopes`]), then the newest translation of the name.
//!
//! A use is free when the name is a whole identifier not preceded by `.`
//! (property access) or `_` (part of an already-inlined name), so a site
//! that was rewritten once is never rewritten again.

use std::ops::Range;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::declarations::{DeclarationBlock, DeclarationBody};
use super::error::{InlineError, InlineResult};
use super::imports::ImportReference;

/// Prefix shared by every generated member name.
pub const INLINED_PREFIX: &str = "_inlined_";

/// Mapping from a declaration's original name to its inlined name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FunctionTranslation {
    pub original_name: String,
    pub new_name: String,
    pub source_url: String,
}

impl FunctionTranslation {
    pub fn new(source_url: &str, original_name: &str) -> Self {
        Self {
            original_name: original_name.to_string(),
            new_name: inlined_name(source_url, original_name),
            source_url: source_url.to_string(),
        }
    }
}

/// `_inlined_` + the sanitized last path segment of `source_url` + `_` + `name`.
pub fn inlined_name(source_url: &str, name: &str) -> String {
    let file = source_url.rsplit('/').next().unwrap_or(source_url);
    let sanitized: String = file
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{INLINED_PREFIX}{sanitized}_{name}")
}

/// Ordered record of every translation made during one run.
///
/// Holds at most one entry per (source URL, original name) pair.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: Vec<FunctionTranslation>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source_url: &str, original_name: &str) -> Option<&FunctionTranslation> {
        self.entries
            .iter()
            .find(|t| t.source_url == source_url && t.original_name == original_name)
    }

    /// Record `translation`; returns `false` if the pair was already recorded.
    pub fn record(&mut self, translation: FunctionTranslation) -> bool {
        if self
            .get(&translation.source_url, &translation.original_name)
            .is_some()
        {
            return false;
        }
        self.entries.push(translation);
        true
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &FunctionTranslation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<FunctionTranslation> {
        self.entries
    }

    /// Newest translation of `original_name` recorded for a file other than
    /// `except_url`.
    fn latest_elsewhere(&self, original_name: &str, except_url: &str) -> Option<&FunctionTranslation> {
        self.entries
            .iter()
            .rev()
            .find(|t| t.original_name == original_name && t.source_url != except_url)
    }
}

/// A name one file imports, and where it is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImportBinding {
    source_url: String,
    imported_name: String,
}

/// Per-file import bindings.
///
/// `import { helper as h } from './a'` in `plugin.js` binds `h` in
/// `plugin.js` to `helper` declared in `a.js`. Code that came from a file is
/// rewritten through that file's bindings, so two files declaring the same
/// name never capture each other's call sites.
#[derive(Debug, Clone, Default)]
pub struct ImportScopes {
    bindings: FxHashMap<String, FxHashMap<String, ImportBinding>>,
}

impl ImportScopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the named imports of the file at `importer_url`.
    ///
    /// The first import of a local name wins.
    pub fn record(&mut self, importer_url: &str, imports: &[ImportReference]) {
        let bindings = self.bindings.entry(importer_url.to_string()).or_default();
        for import in imports {
            for name in &import.names {
                let words: Vec<&str> = name.split_whitespace().collect();
                let (imported, local) = match words.as_slice() {
                    [single] => (*single, *single),
                    [imported, "as", local] => (*imported, *local),
                    _ => continue,
                };
                bindings
                    .entry(local.to_string())
                    .or_insert_with(|| ImportBinding {
                        source_url: import.resolved_url.clone(),
                        imported_name: imported.to_string(),
                    });
            }
        }
    }

    /// Source URL and declared name behind `local_name` in `importer_url`.
    pub fn source_of(&self, importer_url: &str, local_name: &str) -> Option<(&str, &str)> {
        self.bindings
            .get(importer_url)?
            .get(local_name)
            .map(|b| (b.source_url.as_str(), b.imported_name.as_str()))
    }

    fn local_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.values().flat_map(|b| b.keys().map(String::as_str))
    }
}

/// Byte range of an inserted member and the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemberSpan {
    range: Range<usize>,
    source_url: String,
}

/// The accumulating output: one brace-delimited object literal.
///
/// Text outside every inserted member belongs to the buffer's origin file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockBuffer {
    text: String,
    origin: String,
    members: Vec<MemberSpan>,
}

impl CodeBlockBuffer {
    /// Wrap `text`; `origin` is the URL of the file it came from.
    pub fn new(text: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: origin.into(),
            members: Vec::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Byte offset of the buffer's final closing brace.
    pub fn final_brace(&self) -> InlineResult<usize> {
        self.text
            .rfind('}')
            .ok_or_else(|| InlineError::MissingClosingBrace {
                url: self.origin.clone(),
            })
    }

    /// Make sure the last member before the final brace ends with a comma.
    ///
    /// Returns `true` if a comma had to be inserted.
    pub fn ensure_member_separator(&mut self) -> InlineResult<bool> {
        let final_brace = self.final_brace()?;
        let before = self.text[..final_brace].trim_end();
        if before.ends_with(',') || before.ends_with('{') {
            return Ok(false);
        }
        let at = before.len();
        self.text.insert(at, ',');
        self.shift_members(at, 1);
        Ok(true)
    }

    /// Splice `member`, taken from `source_url`, in immediately before the
    /// final closing brace.
    pub fn insert_member(&mut self, member: &str, source_url: &str) -> InlineResult<()> {
        self.ensure_member_separator()?;
        let final_brace = self.final_brace()?;
        self.text.insert_str(final_brace, member);
        self.shift_members(final_brace, member.len());
        self.members.push(MemberSpan {
            range: final_brace..final_brace + member.len(),
            source_url: source_url.to_string(),
        });
        Ok(())
    }

    /// URL of the file the text at `offset` came from.
    pub fn source_at(&self, offset: usize) -> &str {
        self.members
            .iter()
            .find(|m| m.range.contains(&offset))
            .map_or(self.origin.as_str(), |m| m.source_url.as_str())
    }

    /// Replace every free use of `name` with `replacement`.
    ///
    /// Returns the number of sites rewritten.
    pub fn rewrite_free_identifier(&mut self, name: &str, replacement: &str) -> usize {
        self.rewrite_free_identifier_with(name, |_| Some(replacement.to_string()))
    }

    /// Replace free uses of `name` with whatever `resolve` returns for the
    /// file each use came from; `None` leaves that use alone.
    ///
    /// Returns the number of sites rewritten.
    pub fn rewrite_free_identifier_with<F>(&mut self, name: &str, mut resolve: F) -> usize
    where
        F: FnMut(&str) -> Option<String>,
    {
        if name.is_empty() {
            return 0;
        }

        let mut rewritten = String::with_capacity(self.text.len());
        // (offset in the old text, length change)
        let mut edits: Vec<(usize, isize)> = Vec::new();
        let mut last = 0;

        for (start, _) in self.text.match_indices(name) {
            let end = start + name.len();
            if start < last || !is_free_use(&self.text, start, end) {
                continue;
            }
            let Some(replacement) = resolve(self.source_at(start)) else {
                continue;
            };
            rewritten.push_str(&self.text[last..start]);
            rewritten.push_str(&replacement);
            edits.push((start, replacement.len() as isize - name.len() as isize));
            last = end;
        }

        if edits.is_empty() {
            return 0;
        }
        rewritten.push_str(&self.text[last..]);
        self.text = rewritten;

        let moved = |offset: usize| {
            let delta: isize = edits
                .iter()
                .filter(|(at, _)| *at < offset)
                .map(|(_, change)| change)
                .sum();
            offset.saturating_add_signed(delta)
        };
        for member in &mut self.members {
            member.range = moved(member.range.start)..moved(member.range.end);
        }
        edits.len()
    }

    /// Move member spans after an insertion of `len` bytes at `at`.
    fn shift_members(&mut self, at: usize, len: usize) {
        for member in &mut self.members {
            if member.range.start >= at {
                member.range.start += len;
            }
            if member.range.end > at {
                member.range.end += len;
            }
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_free_use(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let free_before = before.is_none_or(|c| !is_identifier_char(c) && c != '.');
    let free_after = after.is_none_or(|c| !is_identifier_char(c));
    free_before && free_after
}

/// Render `declaration` as a member of the output object under `new_name`.
///
/// Block bodies become methods (`async *name(params) { ... }`), brace-less
/// arrows become properties (`name: (params) => expr`). Every line is
/// shifted right by two spaces.
pub fn render_member(declaration: &DeclarationBlock, new_name: &str) -> String {
    let async_marker = if declaration.is_async { "async " } else { "" };
    let params = &declaration.parameter_list_text;
    let member = match &declaration.body {
        DeclarationBody::Block(body) => {
            let generator_marker = if declaration.is_generator { "*" } else { "" };
            format!("{async_marker}{generator_marker}{new_name}({params}) {{{body}")
        }
        DeclarationBody::Expression(expression) => {
            format!("{new_name}: {async_marker}({params}) => {expression}")
        }
    };

    let indented = member
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    let trimmed = indented.trim();
    let separator = if trimmed.ends_with(',') { "" } else { "," };
    format!("\n  {trimmed}{separator}\n")
}

/// Inline one declaration from `source_url` into `buffer`.
///
/// Records a translation, splices the renamed declaration before the final
/// closing brace, then rewrites call sites across the whole buffer. Returns
/// `false` without touching the buffer when the declaration was already
/// inlined during this run.
pub fn inline_declaration(
    declaration: &DeclarationBlock,
    source_url: &str,
    buffer: &mut CodeBlockBuffer,
    translations: &mut TranslationTable,
    scopes: &ImportScopes,
) -> InlineResult<bool> {
    inline_planned(declaration, source_url, buffer, translations, scopes, &[])
}

/// Inline every declaration of one file, in mapping order.
///
/// Inside the file's own members, its declarations are planned up front so
/// an internal call resolves to the same file even before the callee has
/// been spliced in. Returns how many declarations were newly inlined.
pub fn inline_file(
    source_url: &str,
    declarations: &IndexMap<String, DeclarationBlock>,
    buffer: &mut CodeBlockBuffer,
    translations: &mut TranslationTable,
    scopes: &ImportScopes,
) -> InlineResult<usize> {
    let planned: Vec<FunctionTranslation> = declarations
        .values()
        .map(|declaration| FunctionTranslation::new(source_url, &declaration.name))
        .collect();

    let mut inlined = 0;
    for declaration in declarations.values() {
        if inline_planned(declaration, source_url, buffer, translations, scopes, &planned)? {
            inlined += 1;
        }
    }
    Ok(inlined)
}

fn inline_planned(
    declaration: &DeclarationBlock,
    source_url: &str,
    buffer: &mut CodeBlockBuffer,
    translations: &mut TranslationTable,
    scopes: &ImportScopes,
    planned: &[FunctionTranslation],
) -> InlineResult<bool> {
    if translations.get(source_url, &declaration.name).is_some() {
        debug!(name = %declaration.name, source_url, "already inlined, skipping");
        return Ok(false);
    }

    let translation = FunctionTranslation::new(source_url, &declaration.name);
    buffer.insert_member(&render_member(declaration, &translation.new_name), source_url)?;
    debug!(
        name = %translation.original_name,
        new_name = %translation.new_name,
        source_url,
        "inlined declaration"
    );
    translations.record(translation);

    rewrite_call_sites(buffer, translations, scopes, planned);
    Ok(true)
}

/// The translation a free use of `name` in code from `scope` refers to.
///
/// The file's own declarations come first, then its imports. A name the
/// file imports stays unresolved until the file it comes from is inlined.
/// Anything else falls back to the newest translation of that name.
fn resolve_call<'t>(
    name: &str,
    scope: &str,
    translations: &'t TranslationTable,
    scopes: &ImportScopes,
    planned: &'t [FunctionTranslation],
) -> Option<&'t FunctionTranslation> {
    let own = planned
        .iter()
        .find(|t| t.source_url == scope && t.original_name == name)
        .or_else(|| translations.get(scope, name));
    if own.is_some() {
        return own;
    }
    if let Some((source_url, imported_name)) = scopes.source_of(scope, name) {
        return translations.get(source_url, imported_name);
    }
    translations.latest_elsewhere(name, scope)
}

/// Run one rewrite pass per candidate name over the whole buffer.
fn rewrite_call_sites(
    buffer: &mut CodeBlockBuffer,
    translations: &TranslationTable,
    scopes: &ImportScopes,
    planned: &[FunctionTranslation],
) {
    let mut names: Vec<&str> = translations
        .iter()
        .chain(planned)
        .map(|t| t.original_name.as_str())
        .chain(scopes.local_names())
        .collect();
    names.sort_unstable();
    names.dedup();

    for name in names {
        let count = buffer.rewrite_free_identifier_with(name, |scope| {
            resolve_call(name, scope, translations, scopes, planned)
                .map(|t| format!("this.{}", t.new_name))
        });
        if count > 0 {
            debug!(name, count, "rewrote call sites");
        }
    }
}
