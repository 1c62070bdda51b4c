//! Coordinator agent.
//!
//! Gets the writer and analyst as handoff tools (agent-as-tool pattern) plus
//! the issue-tracker tools. Its final answers go through the artifact
//! middleware in [`crate::session`].

use rig::client::CompletionClient;
use rig::providers::openai;

use crate::prompts;
use crate::tools::bundles::{self, CoordinatorWiring};
use crate::tools::issue_tools::{format_issue_types, format_labels};
use crate::tracker::{IssueType, Label};

use super::OaiAgent;

/// Repository facts rendered into the coordinator's preamble.
#[derive(Debug, Clone)]
pub struct CoordinatorContext {
    pub repository: String,
    pub issue_types: Vec<IssueType>,
    pub labels: Vec<Label>,
}

impl CoordinatorContext {
    pub fn preamble(&self) -> String {
        prompts::coordinator_preamble(
            &self.repository,
            &indent(&format_issue_types(&self.issue_types)),
            &indent(&format_labels(&self.labels)),
        )
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the coordinator.
///
/// Tools: think, transfer_to_writer, transfer_to_analyst, issue_write,
/// list_issue_types, list_labels.
pub fn build_coordinator(
    client: &openai::CompletionsClient,
    model: &str,
    ctx: &CoordinatorContext,
    wiring: CoordinatorWiring,
    max_turns: usize,
) -> OaiAgent {
    let preamble = ctx.preamble();
    client
        .agent(model)
        .name("coordinator")
        .description("Routes issue requests between writer and analyst and talks to the user")
        .preamble(&preamble)
        .temperature(0.3)
        .tools(bundles::coordinator_tools(wiring))
        .default_max_turns(max_turns)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::default_issue_types;

    #[test]
    fn test_preamble_lists_types_and_labels_indented() {
        let ctx = CoordinatorContext {
            repository: "acme/widgets".into(),
            issue_types: default_issue_types(),
            labels: vec![Label {
                name: "ui".into(),
                description: Some("Frontend".into()),
            }],
        };
        let preamble = ctx.preamble();
        assert!(preamble.contains("    - Feature: A request, idea, or new functionality."));
        assert!(preamble.contains("    - Bug: An unexpected problem or behavior"));
        assert!(preamble.contains("    - ui: Frontend"));
    }

    #[test]
    fn test_preamble_without_labels() {
        let ctx = CoordinatorContext {
            repository: "acme/widgets".into(),
            issue_types: default_issue_types(),
            labels: vec![],
        };
        assert!(ctx.preamble().contains("acme/widgets"));
    }
}
