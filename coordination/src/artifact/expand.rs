//! Reference expansion: replace tags with the content they point to.
//!
//! Expansion is a single left-to-right pass. Content inserted for a tag is
//! never re-scanned, so an artifact that itself contains a tag is expanded one
//! level deep only. Tags whose id is unknown and malformed markers are kept
//! verbatim.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::reference::{count_malformed, scan};
use super::store::{ArtifactId, ArtifactStore};

/// What a single expansion pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionReport {
    /// Ids replaced by content, in text order.
    pub expanded: Vec<ArtifactId>,
    /// Well-formed tags whose id the store does not know, in text order.
    pub unresolved: Vec<ArtifactId>,
    /// `<artifact` markers that did not parse as a tag.
    pub malformed: usize,
}

impl ExpansionReport {
    /// True when the output is identical to the input.
    pub fn is_noop(&self) -> bool {
        self.expanded.is_empty()
    }

    /// True when something tag-like was left unexpanded.
    pub fn has_leftovers(&self) -> bool {
        !self.unresolved.is_empty() || self.malformed > 0
    }
}

/// Expanded text plus the report for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    pub report: ExpansionReport,
}

/// Expand every resolvable reference tag in `text`.
pub fn expand_references(text: &str, store: &ArtifactStore) -> Expansion {
    let matches = scan(text);
    let malformed = count_malformed(text, &matches);
    if malformed > 0 {
        debug!(malformed, "Left malformed artifact markers as literal text");
    }

    if matches.is_empty() {
        return Expansion {
            text: text.to_string(),
            report: ExpansionReport {
                malformed,
                ..Default::default()
            },
        };
    }

    let mut report = ExpansionReport {
        malformed,
        ..Default::default()
    };
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for found in matches {
        out.push_str(&text[cursor..found.span.start]);
        match store.get(&found.tag.id) {
            Some(artifact) => {
                out.push_str(&artifact.content);
                report.expanded.push(found.tag.id);
            }
            None => {
                warn!(artifact_id = %found.tag.id, "Unknown artifact reference left unexpanded");
                out.push_str(&text[found.span.clone()]);
                report.unresolved.push(found.tag.id);
            }
        }
        cursor = found.span.end;
    }
    out.push_str(&text[cursor..]);

    Expansion { text: out, report }
}

/// Expand references and discard the report.
pub fn expand(text: &str, store: &ArtifactStore) -> String {
    expand_references(text, store).text
}
