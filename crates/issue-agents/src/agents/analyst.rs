//! Duplicate-search analyst agent.

use std::sync::Arc;

use rig::client::CompletionClient;
use rig::providers::openai;

use crate::prompts;
use crate::tools::bundles;
use crate::tracker::IssueTracker;

use super::OaiAgent;

/// Build the analyst.
///
/// Tools: search_issues.
pub fn build_analyst(
    client: &openai::CompletionsClient,
    model: &str,
    tracker: Arc<dyn IssueTracker>,
    max_turns: usize,
) -> OaiAgent {
    client
        .agent(model)
        .name("analyst")
        .description("Searches existing issues for duplicates of a draft")
        .preamble(prompts::ANALYST_PREAMBLE)
        .temperature(0.1)
        .tools(bundles::analyst_tools(tracker))
        .default_max_turns(max_turns)
        .build()
}
