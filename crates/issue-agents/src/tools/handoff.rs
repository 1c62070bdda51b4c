//! Agent-as-tool handoff with artifact storage.
//!
//! Wraps a [`Delegate`] so the coordinator can call it by name. Depending on
//! the [`RevealPolicy`], the delegate's output is either returned inline or
//! stored as an immutable artifact and replaced by a reference tag.

use std::sync::Arc;

use coordination::{expand_references, OutputEnvelope, ReferenceTag, SharedArtifactStore};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ToolError;
use crate::delegate::Delegate;

/// Marks a summary-policy reply that carries no draft.
pub const NO_DRAFT: &str = "no draft";

/// What the caller of a handoff gets back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPolicy {
    /// The delegate's output, unchanged. Nothing is stored.
    Full,
    /// A reference tag plus a one-line summary. The output is stored.
    #[default]
    Summary,
}

impl RevealPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Summary => "summary",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HandoffArgs {
    /// Task for the delegate. May contain reference tags.
    pub task: String,
}

/// A delegate exposed to the coordinator as a tool.
pub struct ArtifactHandoffTool {
    target: Arc<dyn Delegate>,
    store: SharedArtifactStore,
    name: String,
    description: String,
    propagate_inputs: bool,
    reveal_policy: RevealPolicy,
}

impl ArtifactHandoffTool {
    pub fn new(
        target: Arc<dyn Delegate>,
        store: SharedArtifactStore,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            target,
            store,
            name: name.into(),
            description: description.into(),
            propagate_inputs: false,
            reveal_policy: RevealPolicy::default(),
        }
    }

    /// Forward the task verbatim instead of expanding its reference tags.
    pub fn propagate_inputs(mut self, propagate: bool) -> Self {
        self.propagate_inputs = propagate;
        self
    }

    pub fn reveal_policy(mut self, policy: RevealPolicy) -> Self {
        self.reveal_policy = policy;
        self
    }

    pub fn policy(&self) -> RevealPolicy {
        self.reveal_policy
    }

    /// Run one handoff: resolve input, delegate, then apply the reveal policy.
    ///
    /// The store is only written after the delegate has returned successfully.
    pub async fn invoke(&self, task: &str) -> Result<String, ToolError> {
        let resolved = if self.propagate_inputs {
            task.to_string()
        } else {
            let expansion = expand_references(task, &self.store);
            if !expansion.report.is_noop() {
                debug!(
                    tool = %self.name,
                    expanded = expansion.report.expanded.len(),
                    "Expanded references in handoff input"
                );
            }
            expansion.text
        };

        let output = match self.target.run(&resolved).await {
            Ok(output) => output,
            Err(err) => {
                warn!(tool = %self.name, delegate = %self.target.name(), error = %err, "Handoff delegate failed");
                return Err(err.into());
            }
        };

        match self.reveal_policy {
            RevealPolicy::Full => {
                info!(tool = %self.name, policy = "full", bytes = output.len(), "Handoff returned output inline");
                Ok(output)
            }
            RevealPolicy::Summary => Ok(self.store_output(&output)),
        }
    }

    /// Store `output` and build the tag text returned to the caller.
    ///
    /// Output without an `ARTIFACT` header is not a draft (typically a
    /// clarification question); its summary says so instead of quoting it.
    /// Output so short that it occurs inside the returned text itself gets
    /// the bare tag. Output that is a substring of the bare tag (such as
    /// `"a"`) cannot be hidden.
    fn store_output(&self, output: &str) -> String {
        let envelope = OutputEnvelope::parse(output);
        let chars = envelope.body.chars().count();
        let summary = if !envelope.explicit {
            format!("{} reply ({NO_DRAFT}, {chars} chars)", self.name)
        } else if envelope.summary.is_empty() || leaks(&envelope.summary, output) {
            format!("{} draft ({chars} chars)", self.name)
        } else {
            envelope.summary
        };

        let id = self.store.put(envelope.body, summary.clone());
        info!(tool = %self.name, policy = "summary", artifact_id = %id, bytes = output.len(), draft = envelope.explicit, "Handoff output stored as artifact");

        let tag = ReferenceTag::new(id.clone()).with_summary(summary.clone());
        let text = format!("{tag}\n\nSummary: {summary}");
        if leaks(&text, output) {
            debug!(tool = %self.name, artifact_id = %id, "Output occurs in the reference text; returning the bare tag");
            return ReferenceTag::new(id).render();
        }
        text
    }
}

/// Whether `text` contains the whole output verbatim.
fn leaks(text: &str, output: &str) -> bool {
    let output = output.trim();
    !output.is_empty() && text.contains(output)
}

impl Tool for ArtifactHandoffTool {
    const NAME: &'static str = "artifact_handoff";
    type Error = ToolError;
    type Args = HandoffArgs;
    type Output = String;

    fn name(&self) -> String {
        self.name.clone()
    }

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "task": {
                        "type": "string",
                        "description": "Complete task for the delegate, including any <artifact id=\"...\" /> tags it should work from"
                    }
                },
                "required": ["task"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        self.invoke(&args.task).await
    }
}
