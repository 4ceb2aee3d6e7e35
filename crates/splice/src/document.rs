//! Markdown note handling.
//!
//! A note names its source with a `repo:` or `entry:` line and receives the
//! inlined code inside a fenced code block:
//!
//! ~~~text
//! repo: alloy-org/plugin-builder
//!
//! # Code block
//! ```javascript
//! // Synced from alloy-org/plugin-builder at 2026-01-01T00:00:00Z
//! const plugin = { ... }
//! ```
//! ~~~

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;

use crate::entry::SourceReference;

static REPO_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*repo:\s*(?:https?://[^/\s]+/)?([\w.-]+)/([\w.-]+?)(?:\.git)?/?\s*$")
        .expect("repo line pattern is valid")
});

static ENTRY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*entry:\s*(\S+)\s*$").expect("entry line pattern is valid")
});

/// Errors from reading or updating a note
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("note has no `repo:` or `entry:` line")]
    NoSourceReference,

    #[error("note has no fenced code block to write into")]
    NoInsertLocation,

    /// The block would exceed the configured size; nothing was written
    #[error("inlined code is {chars} characters, over the {max} character limit")]
    OutputTooLarge { chars: usize, max: usize },
}

/// Where a sync came from and when, written as the first line of the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub reference: String,
    pub synced_at: DateTime<Utc>,
}

impl Provenance {
    pub fn now(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            synced_at: Utc::now(),
        }
    }

    pub fn comment(&self) -> String {
        format!(
            "// Synced from {} at {}",
            self.reference,
            self.synced_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// A fenced code block located in a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockRange {
    /// Byte range of the lines between the fences
    pub body: Range<usize>,
    /// Info string after the opening fence, if any
    pub language: Option<String>,
}

#[derive(Debug)]
enum Landmark {
    Heading { title: String },
    Block(CodeBlockRange),
}

/// A markdown note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn parse(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The first `repo:` or `entry:` line, outside code blocks.
    pub fn source_reference(&self) -> Result<SourceReference, DocumentError> {
        let mut fence: Option<&str> = None;
        for line in self.text.lines() {
            if let Some(marker) = fence_marker(line) {
                fence = match fence {
                    Some(open) if marker.starts_with(open) => None,
                    Some(open) => Some(open),
                    None => Some(marker),
                };
                continue;
            }
            if fence.is_some() {
                continue;
            }
            if let Some(caps) = REPO_LINE.captures(line) {
                return Ok(SourceReference::repository(&caps[1], &caps[2]));
            }
            if let Some(caps) = ENTRY_LINE.captures(line) {
                return Ok(SourceReference::file(&caps[1]));
            }
        }
        Err(DocumentError::NoSourceReference)
    }

    /// The code block to replace.
    ///
    /// With a heading, the first block between that heading and the next
    /// one; otherwise, or when that section has no block, the first block
    /// in the note.
    pub fn insert_range(&self, heading: Option<&str>) -> Result<CodeBlockRange, DocumentError> {
        let landmarks = self.landmarks();

        if let Some(wanted) = heading.map(normalize_heading) {
            let in_section = landmarks
                .iter()
                .skip_while(|l| !matches!(l, Landmark::Heading { title } if *title == wanted))
                .skip(1)
                .take_while(|l| matches!(l, Landmark::Block(_)))
                .find_map(|l| match l {
                    Landmark::Block(range) => Some(range.clone()),
                    Landmark::Heading { .. } => None,
                });
            if let Some(range) = in_section {
                return Ok(range);
            }
        }

        landmarks
            .into_iter()
            .find_map(|l| match l {
                Landmark::Block(range) => Some(range),
                Landmark::Heading { .. } => None,
            })
            .ok_or(DocumentError::NoInsertLocation)
    }

    /// New note text with `range`'s body replaced by the provenance comment
    /// and `code`.
    ///
    /// Fails with [`DocumentError::OutputTooLarge`] when the new body has
    /// more than `max_chars` characters.
    pub fn replace_code_block(
        &self,
        range: &CodeBlockRange,
        code: &str,
        provenance: &Provenance,
        max_chars: usize,
    ) -> Result<String, DocumentError> {
        let body = format!("{}\n{}\n", provenance.comment(), code.trim_end());
        let chars = body.chars().count();
        if chars > max_chars {
            return Err(DocumentError::OutputTooLarge {
                chars,
                max: max_chars,
            });
        }

        let mut updated = String::with_capacity(self.text.len() + body.len());
        updated.push_str(&self.text[..range.body.start]);
        updated.push_str(&body);
        updated.push_str(&self.text[range.body.end..]);
        Ok(updated)
    }

    /// Headings and closed code blocks, in document order.
    fn landmarks(&self) -> Vec<Landmark> {
        let mut landmarks = Vec::new();
        // (marker, info string, body start)
        let mut open: Option<(&str, Option<String>, usize)> = None;
        let mut offset = 0;

        for line in self.text.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();

            let fence = fence_marker(line);
            if let Some((marker, _, _)) = &open {
                if fence.is_some_and(|closing| closing.starts_with(*marker)) {
                    if let Some((_, language, body_start)) = open.take() {
                        landmarks.push(Landmark::Block(CodeBlockRange {
                            body: body_start..line_start,
                            language,
                        }));
                    }
                }
                continue;
            }

            if let Some(marker) = fence {
                let info = line.trim()[marker.len()..].trim();
                let language = (!info.is_empty()).then(|| info.to_string());
                open = Some((marker, language, offset));
            } else if line.trim_start().starts_with('#') {
                landmarks.push(Landmark::Heading {
                    title: normalize_heading(line),
                });
            }
        }

        landmarks
    }
}

/// The run of backticks or tildes opening `line`, if it is a fence.
fn fence_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let fence_char = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == fence_char).count();
    (len >= 3).then(|| &trimmed[..len])
}

fn normalize_heading(heading: &str) -> String {
    heading
        .trim()
        .trim_start_matches('#')
        .trim()
        .to_lowercase()
}
