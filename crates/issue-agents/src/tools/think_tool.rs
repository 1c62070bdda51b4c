//! Scratchpad tool: lets the coordinator write down its reasoning between steps.

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use tracing::debug;

use super::ToolError;

#[derive(Deserialize)]
pub struct ThinkArgs {
    pub thought: String,
}

pub struct ThinkTool;

impl Tool for ThinkTool {
    const NAME: &'static str = "think";
    type Error = ToolError;
    type Args = ThinkArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.into(),
            description: "Think through the request before acting: which requirements are \
                          still missing, which tool to call next, and whether the user must \
                          confirm anything. Has no side effects."
                .into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "thought": {
                        "type": "string",
                        "description": "Your reasoning"
                    }
                },
                "required": ["thought"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        debug!(chars = args.thought.chars().count(), "think");
        Ok("Noted.".into())
    }
}
