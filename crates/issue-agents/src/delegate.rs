//! Delegate contract: a unit of work that turns a task description into text.
//!
//! Handoff tools wrap a `Delegate`. Production delegates are rig agents
//! ([`AgentDelegate`]); tests provide their own implementations.

use async_trait::async_trait;
use rig::completion::Prompt;
use tracing::debug;

use crate::agents::OaiAgent;

/// The wrapped agent failed to produce an output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("delegate `{delegate}` failed: {message}")]
pub struct DelegateError {
    pub delegate: String,
    pub message: String,
}

impl DelegateError {
    pub fn new(delegate: impl Into<String>, message: impl ToString) -> Self {
        Self {
            delegate: delegate.into(),
            message: message.to_string(),
        }
    }
}

/// Something a handoff can delegate a task to.
///
/// `run` is awaited to completion; the caller only ever sees one consolidated
/// output or one error.
#[async_trait]
pub trait Delegate: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, task: &str) -> Result<String, DelegateError>;
}

/// A rig agent used as a delegate.
pub struct AgentDelegate {
    name: String,
    agent: OaiAgent,
}

impl AgentDelegate {
    pub fn new(name: impl Into<String>, agent: OaiAgent) -> Self {
        Self {
            name: name.into(),
            agent,
        }
    }
}

#[async_trait]
impl Delegate for AgentDelegate {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, task: &str) -> Result<String, DelegateError> {
        debug!(delegate = %self.name, task_bytes = task.len(), "Prompting delegate agent");
        self.agent
            .prompt(task)
            .await
            .map_err(|e| DelegateError::new(&self.name, e))
    }
}
