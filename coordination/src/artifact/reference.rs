//! Inline reference tags: `<artifact id="..." summary="..." />`.
//!
//! Tags are self-closing, one line, and carry a required `id` plus an optional
//! `summary` in either order. The grammar is strict: ids are restricted to
//! `[A-Za-z0-9_.:-]` and attribute values never contain `"`, `<` or `>`, so a
//! match can never run across two markers. Anything that looks like a tag but
//! does not match the grammar is left alone by callers.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::errors::{ArtifactError, ArtifactResult};
use super::store::ArtifactId;

const TAG_PATTERN: &str = r#"<artifact\s+(?:id="(?P<id>[A-Za-z0-9_.:-]+)"(?:\s+summary="(?P<summary>[^"<>]*)")?|summary="(?P<summary_first>[^"<>]*)"\s+id="(?P<id_last>[A-Za-z0-9_.:-]+)")\s*/>"#;

/// Strict tag grammar, unanchored, for scanning free-form text.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TAG_PATTERN).expect("TAG_RE regex should compile"));

/// Same grammar anchored to the whole input, for [`ReferenceTag::parse`].
static TAG_EXACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*(?:{TAG_PATTERN})\s*$")).expect("TAG_EXACT_RE regex should compile")
});

/// Anything that starts like a tag, matched or not.
static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<artifact\b").expect("MARKER_RE regex should compile"));

/// A parsed reference to a stored artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTag {
    pub id: ArtifactId,
    pub summary: Option<String>,
}

impl ReferenceTag {
    pub fn new(id: ArtifactId) -> Self {
        Self { id, summary: None }
    }

    /// Attach a summary. Blank summaries are dropped.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        self.summary = if summary.trim().is_empty() {
            None
        } else {
            Some(summary)
        };
        self
    }

    /// Parse a string that must consist of exactly one tag (surrounding
    /// whitespace allowed).
    pub fn parse(input: &str) -> ArtifactResult<Self> {
        TAG_EXACT_RE
            .captures(input)
            .and_then(|caps| Self::from_captures(&caps))
            .ok_or_else(|| ArtifactError::MalformedReference(input.to_string()))
    }

    /// Serialize to the inline tag form.
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let id = caps.name("id").or_else(|| caps.name("id_last"))?;
        let summary = caps
            .name("summary")
            .or_else(|| caps.name("summary_first"))
            .map(|m| unescape_attr(m.as_str()))
            .filter(|s| !s.is_empty());
        Some(Self {
            id: ArtifactId::new(id.as_str()),
            summary,
        })
    }
}

impl fmt::Display for ReferenceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.summary {
            Some(summary) => write!(
                f,
                r#"<artifact id="{}" summary="{}" />"#,
                self.id,
                escape_attr(summary)
            ),
            None => write!(f, r#"<artifact id="{}" />"#, self.id),
        }
    }
}

/// A tag located inside a larger text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    pub tag: ReferenceTag,
    /// Byte range of the whole tag in the scanned text.
    pub span: Range<usize>,
}

/// Find every well-formed tag in `text`, left to right.
pub fn scan(text: &str) -> Vec<TagMatch> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let tag = ReferenceTag::from_captures(&caps)?;
            Some(TagMatch {
                tag,
                span: whole.range(),
            })
        })
        .collect()
}

/// Count `<artifact` markers that are not the start of a well-formed tag.
pub fn count_malformed(text: &str, matches: &[TagMatch]) -> usize {
    MARKER_RE
        .find_iter(text)
        .filter(|marker| !matches.iter().any(|m| m.span.start == marker.start()))
        .count()
}

/// Whether `text` contains at least one well-formed tag.
pub fn contains_reference(text: &str) -> bool {
    TAG_RE.is_match(text)
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

fn unescape_attr(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
