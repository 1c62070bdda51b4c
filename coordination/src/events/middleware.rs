//! Final-answer middleware that resolves artifact references.

use tracing::{debug, info};

use super::types::{AnswerObserver, FinalAnswerEvent};
use crate::artifact::{expand_references, Expansion, SharedArtifactStore};

/// Expands reference tags in the coordinator's final answer.
///
/// This is the only place tags turn back into content. Agent-to-agent text
/// never passes through it and keeps its tags.
#[derive(Debug, Clone)]
pub struct ArtifactMiddleware {
    store: SharedArtifactStore,
}

impl ArtifactMiddleware {
    pub fn new(store: SharedArtifactStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SharedArtifactStore {
        &self.store
    }

    /// Expand `text` in a single pass and return the result.
    pub fn expand(&self, text: &str) -> String {
        self.expand_with_report(text).text
    }

    pub fn expand_with_report(&self, text: &str) -> Expansion {
        let expansion = expand_references(text, &self.store);
        let report = &expansion.report;
        if report.is_noop() && !report.has_leftovers() {
            debug!("Final answer has no artifact references");
        } else {
            info!(
                expanded = report.expanded.len(),
                unresolved = report.unresolved.len(),
                malformed = report.malformed,
                "Expanded artifact references in final answer"
            );
        }
        expansion
    }
}

impl AnswerObserver for ArtifactMiddleware {
    fn on_final_answer(&self, event: &mut FinalAnswerEvent) {
        let expanded = self.expand(&event.text);
        event.text = expanded;
    }
}
