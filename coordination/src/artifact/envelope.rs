//! Producer-side output envelope.
//!
//! A drafting agent may prefix its output with
//!
//! ```text
//! ARTIFACT
//! ARTIFACT_SUMMARY: Brief one-line description
//!
//! <body>
//! ```
//!
//! [`OutputEnvelope::parse`] splits that header off. Output without the header
//! is kept byte-for-byte as the body and gets a summary derived from its first
//! non-empty line.

const MARKER_LINE: &str = "ARTIFACT";
const SUMMARY_PREFIX: &str = "ARTIFACT_SUMMARY:";

/// Maximum characters of a derived summary.
pub const MAX_SUMMARY_CHARS: usize = 80;

/// Body and summary extracted from a delegate's raw output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEnvelope {
    pub body: String,
    pub summary: String,
    /// Whether the output carried an explicit envelope header.
    pub explicit: bool,
}

impl OutputEnvelope {
    pub fn parse(output: &str) -> Self {
        Self::parse_explicit(output).unwrap_or_else(|| Self {
            body: output.to_string(),
            summary: derive_summary(output),
            explicit: false,
        })
    }

    fn parse_explicit(output: &str) -> Option<Self> {
        let trimmed = output.trim_start();
        let mut lines = trimmed.splitn(3, '\n');
        if lines.next()?.trim_end() != MARKER_LINE {
            return None;
        }
        let summary_line = lines.next()?.trim();
        let summary = summary_line.strip_prefix(SUMMARY_PREFIX)?.trim();
        let body = lines.next().unwrap_or_default().trim_start_matches(['\r', '\n']);

        let summary = if summary.is_empty() {
            derive_summary(body)
        } else {
            summary.to_string()
        };

        Some(Self {
            body: body.to_string(),
            summary,
            explicit: true,
        })
    }
}

/// First non-empty line, without fence markers, truncated on a char boundary.
pub fn derive_summary(text: &str) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .map(|l| l.trim_start_matches(['~', '`']).trim())
        .find(|l| !l.is_empty() && *l != "markdown")
        .unwrap_or("");

    if line.chars().count() <= MAX_SUMMARY_CHARS {
        line.to_string()
    } else {
        let cut: String = line.chars().take(MAX_SUMMARY_CHARS - 3).collect();
        format!("{}...", cut.trim_end())
    }
}
