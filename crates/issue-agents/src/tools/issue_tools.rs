//! Issue-tracker tools for the coordinator and analyst.
//!
//! Listing and search tools degrade to a plain message when the tracker is
//! unreachable. `issue_write` does not: a failed or unapproved creation is an
//! error the coordinator has to handle.

use std::sync::Arc;

use coordination::{expand_references, SharedArtifactStore};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use tracing::{info, warn};

use super::ToolError;
use crate::tracker::{
    issue_types_or_default, labels_or_empty, ApprovalGate, IssueDraft, IssueTracker, IssueType,
    Label,
};

const DEFAULT_SEARCH_LIMIT: usize = 5;
const MAX_SEARCH_LIMIT: usize = 20;
const FENCE_OPEN: &str = "~~~markdown";
const FENCE: &str = "~~~";

// ── issue_write ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IssueWriteArgs {
    /// Explicit title. When absent, the first line of the draft is used.
    #[serde(default)]
    pub title: Option<String>,
    /// Issue body, or a whole fenced draft, or an artifact tag for one.
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, rename = "type")]
    pub issue_type: Option<String>,
}

/// Create an issue after the user approves it.
///
/// Reference tags in the arguments are expanded first; an id the store does
/// not know aborts the call so the tracker never receives a raw tag.
pub struct IssueWriteTool {
    tracker: Arc<dyn IssueTracker>,
    store: SharedArtifactStore,
    approval: Arc<dyn ApprovalGate>,
}

impl IssueWriteTool {
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        store: SharedArtifactStore,
        approval: Arc<dyn ApprovalGate>,
    ) -> Self {
        Self {
            tracker,
            store,
            approval,
        }
    }

    fn resolve(&self, text: &str) -> Result<String, ToolError> {
        let expansion = expand_references(text, &self.store);
        if !expansion.report.unresolved.is_empty() {
            return Err(ToolError::UnresolvedReference(expansion.report.unresolved));
        }
        Ok(expansion.text)
    }

    /// Build the draft the tracker will receive.
    pub fn prepare(&self, args: IssueWriteArgs) -> Result<IssueDraft, ToolError> {
        let body = self.resolve(&args.body)?;
        let explicit_title = match args.title {
            Some(title) if !title.trim().is_empty() => Some(self.resolve(title.trim())?),
            _ => None,
        };

        let (title, body) = match explicit_title {
            Some(title) => (title, strip_fence(&body).to_string()),
            None => split_draft(&body)
                .ok_or_else(|| ToolError::InvalidInput("issue draft has no title line".into()))?,
        };

        Ok(IssueDraft {
            title,
            body,
            labels: args.labels,
            issue_type: args.issue_type.filter(|t| !t.trim().is_empty()),
        })
    }
}

/// Remove an outer `~~~markdown` ... `~~~` fence if present.
pub fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix(FENCE_OPEN) {
        Some(inner) => inner
            .strip_suffix(FENCE)
            .unwrap_or(inner)
            .trim_matches(['\r', '\n']),
        None => trimmed,
    }
}

/// Split a drafted issue into its title line and the remaining body.
pub fn split_draft(draft: &str) -> Option<(String, String)> {
    let inner = strip_fence(draft);
    let (title, rest) = match inner.trim_start().split_once('\n') {
        Some((title, rest)) => (title.trim(), rest),
        None => (inner.trim(), ""),
    };
    if title.is_empty() {
        return None;
    }
    Some((title.to_string(), rest.trim().to_string()))
}

impl Tool for IssueWriteTool {
    const NAME: &'static str = "issue_write";
    type Error = ToolError;
    type Args = IssueWriteArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.into(),
            description: "Create the issue in the repository. Only call after the user has \
                          explicitly approved the draft. Pass the approved draft (or its \
                          artifact tag) as body; the first line of the draft becomes the title."
                .into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "Optional explicit title; defaults to the draft's first line"
                    },
                    "body": {
                        "type": "string",
                        "description": "Approved draft or <artifact id=\"...\" /> tag"
                    },
                    "labels": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Labels from the available label list"
                    },
                    "type": {
                        "type": "string",
                        "description": "Issue type from the available type list"
                    }
                },
                "required": ["body"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let draft = self.prepare(args)?;

        if !self.approval.approve(&draft).await {
            info!(title = %draft.title, "Issue creation declined by user");
            return Err(ToolError::NotApproved(draft.title));
        }

        let created = self.tracker.create_issue(draft).await?;
        Ok(format!(
            "Created issue #{}: {} ({})",
            created.number, created.title, created.html_url
        ))
    }
}

// ── list_issue_types / list_labels ───────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct NoArgs {}

pub fn format_issue_types(types: &[IssueType]) -> String {
    types
        .iter()
        .map(|t| format!("- {}: {}", t.name, t.description.as_deref().unwrap_or("")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_labels(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|l| format!("- {}: {}", l.name, l.description.as_deref().unwrap_or("")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct ListIssueTypesTool {
    tracker: Arc<dyn IssueTracker>,
}

impl ListIssueTypesTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }
}

impl Tool for ListIssueTypesTool {
    const NAME: &'static str = "list_issue_types";
    type Error = ToolError;
    type Args = NoArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.into(),
            description: "List the issue types available in the repository.".into(),
            parameters: serde_json::json!({ "type": "object", "properties": {} }),
        }
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let types = issue_types_or_default(self.tracker.as_ref()).await;
        Ok(format_issue_types(&types))
    }
}

pub struct ListLabelsTool {
    tracker: Arc<dyn IssueTracker>,
}

impl ListLabelsTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }
}

impl Tool for ListLabelsTool {
    const NAME: &'static str = "list_labels";
    type Error = ToolError;
    type Args = NoArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.into(),
            description: "List the labels available in the repository.".into(),
            parameters: serde_json::json!({ "type": "object", "properties": {} }),
        }
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let labels = labels_or_empty(self.tracker.as_ref()).await;
        if labels.is_empty() {
            return Ok("No labels available.".into());
        }
        Ok(format_labels(&labels))
    }
}

// ── search_issues ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchIssuesArgs {
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Search existing issues for possible duplicates.
pub struct SearchIssuesTool {
    tracker: Arc<dyn IssueTracker>,
}

impl SearchIssuesTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }
}

impl Tool for SearchIssuesTool {
    const NAME: &'static str = "search_issues";
    type Error = ToolError;
    type Args = SearchIssuesArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.into(),
            description: "Search existing issues in the repository by keywords. \
                          Use short, specific queries (3-6 keywords)."
                .into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search keywords"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum results (default 5, max 20)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let query = args.query.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidInput("query must not be empty".into()));
        }
        let limit = args
            .limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);

        let issues = match self.tracker.search_issues(query, limit).await {
            Ok(issues) => issues,
            Err(err) => {
                warn!(query, error = %err, "Issue search failed; degrading gracefully");
                return Ok(format!(
                    "Issue search failed for '{query}'. Proceed without duplicate information. Error: {err}"
                ));
            }
        };

        if issues.is_empty() {
            return Ok(format!("No existing issues match '{query}'."));
        }

        let lines: Vec<String> = issues
            .iter()
            .map(|i| format!("- #{} [{}] {} ({})", i.number, i.state, i.title, i.html_url))
            .collect();
        Ok(format!(
            "## Issues matching '{query}'\n\n{}",
            lines.join("\n")
        ))
    }
}
