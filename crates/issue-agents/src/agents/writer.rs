//! Technical writer agent.

use rig::client::CompletionClient;
use rig::providers::openai;

use crate::prompts;
use crate::templates::WriterContext;

use super::OaiAgent;

/// Build the writer.
///
/// NO tools: the writer drafts from the task text alone and answers with an
/// artifact envelope, or a plain-text clarification question.
pub fn build_writer(client: &openai::CompletionsClient, model: &str, ctx: &WriterContext) -> OaiAgent {
    let preamble = prompts::writer_preamble(ctx);
    client
        .agent(model)
        .name("writer")
        .description("Technical writer that drafts issues from bug reports and feature requests")
        .preamble(&preamble)
        .temperature(0.2)
        .build()
}
