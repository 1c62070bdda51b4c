//! Tool bundle constructors for role-based agent wiring.
//!
//! # Roles
//!
//! - **Coordinator**: think, transfer_to_writer, transfer_to_analyst,
//!   issue_write, list_issue_types, list_labels
//! - **Analyst**: search_issues

use std::sync::Arc;

use coordination::SharedArtifactStore;
use rig::tool::ToolDyn;

use super::handoff::{ArtifactHandoffTool, RevealPolicy};
use super::issue_tools::{IssueWriteTool, ListIssueTypesTool, ListLabelsTool, SearchIssuesTool};
use super::think_tool::ThinkTool;
use crate::delegate::Delegate;
use crate::tracker::{ApprovalGate, IssueTracker};

pub const WRITER_HANDOFF: &str = "transfer_to_writer";
pub const ANALYST_HANDOFF: &str = "transfer_to_analyst";

/// Delegates and collaborators the coordinator's tools are built from.
pub struct CoordinatorWiring {
    pub writer: Arc<dyn Delegate>,
    pub analyst: Arc<dyn Delegate>,
    pub tracker: Arc<dyn IssueTracker>,
    pub approval: Arc<dyn ApprovalGate>,
    pub store: SharedArtifactStore,
}

/// Writer handoff: drafts are stored, the coordinator only sees the tag.
pub fn writer_handoff(writer: Arc<dyn Delegate>, store: SharedArtifactStore) -> ArtifactHandoffTool {
    ArtifactHandoffTool::new(
        writer,
        store,
        WRITER_HANDOFF,
        "Assign to the technical writer for drafting or revising an issue. \
         Returns an artifact tag for the draft.",
    )
    .propagate_inputs(false)
    .reveal_policy(RevealPolicy::Summary)
}

/// Analyst handoff: the search report comes back inline.
pub fn analyst_handoff(analyst: Arc<dyn Delegate>, store: SharedArtifactStore) -> ArtifactHandoffTool {
    ArtifactHandoffTool::new(
        analyst,
        store,
        ANALYST_HANDOFF,
        "Assign to the analyst for a duplicate issue search. Pass the draft's artifact tag.",
    )
    .propagate_inputs(false)
    .reveal_policy(RevealPolicy::Full)
}

/// Build the full tool bundle for the coordinator agent.
pub fn coordinator_tools(wiring: CoordinatorWiring) -> Vec<Box<dyn ToolDyn>> {
    vec![
        Box::new(ThinkTool),
        Box::new(writer_handoff(wiring.writer, wiring.store.clone())),
        Box::new(analyst_handoff(wiring.analyst, wiring.store.clone())),
        Box::new(IssueWriteTool::new(
            wiring.tracker.clone(),
            wiring.store,
            wiring.approval,
        )),
        Box::new(ListIssueTypesTool::new(wiring.tracker.clone())),
        Box::new(ListLabelsTool::new(wiring.tracker)),
    ]
}

/// Build the tool bundle for the analyst agent.
pub fn analyst_tools(tracker: Arc<dyn IssueTracker>) -> Vec<Box<dyn ToolDyn>> {
    vec![Box::new(SearchIssuesTool::new(tracker))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::DelegateError;
    use crate::tracker::{AutoApprove, NoOpTracker};
    use async_trait::async_trait;
    use coordination::ArtifactStore;

    struct Echo;

    #[async_trait]
    impl Delegate for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn run(&self, task: &str) -> Result<String, DelegateError> {
            Ok(task.to_string())
        }
    }

    fn wiring() -> CoordinatorWiring {
        CoordinatorWiring {
            writer: Arc::new(Echo),
            analyst: Arc::new(Echo),
            tracker: Arc::new(NoOpTracker),
            approval: Arc::new(AutoApprove),
            store: ArtifactStore::new().shared(),
        }
    }

    #[test]
    fn test_coordinator_has_6_tools() {
        let tools = coordinator_tools(wiring());
        assert_eq!(tools.len(), 6);
    }

    #[test]
    fn test_coordinator_tool_names() {
        let names: Vec<String> = coordinator_tools(wiring()).iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "think",
                WRITER_HANDOFF,
                ANALYST_HANDOFF,
                "issue_write",
                "list_issue_types",
                "list_labels"
            ]
        );
    }

    #[test]
    fn test_handoff_policies() {
        let store = ArtifactStore::new().shared();
        assert_eq!(
            writer_handoff(Arc::new(Echo), store.clone()).policy(),
            RevealPolicy::Summary
        );
        assert_eq!(
            analyst_handoff(Arc::new(Echo), store).policy(),
            RevealPolicy::Full
        );
    }

    #[test]
    fn test_analyst_tools() {
        let tools = analyst_tools(Arc::new(NoOpTracker));
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name(), "search_issues");
    }
}
