//! Rig-compatible tools for the coordinator and its delegates.
//!
//! Each tool implements `rig::tool::Tool` and is attached to agents via
//! `AgentBuilder::tools()` (see [`bundles`]).

pub mod bundles;
pub mod handoff;
pub mod issue_tools;
pub mod think_tool;

use coordination::ArtifactId;

use crate::delegate::DelegateError;
use crate::tracker::TrackerError;

/// Errors that can occur during tool execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    Delegate(#[from] DelegateError),

    #[error("issue tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("issue creation for `{0}` was not approved by the user")]
    NotApproved(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unresolved artifact references: {}", join_ids(.0))]
    UnresolvedReference(Vec<ArtifactId>),
}

fn join_ids(ids: &[ArtifactId]) -> String {
    ids.iter()
        .map(ArtifactId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
