//! Multi-turn coordinator session.
//!
//! One session owns one artifact store. Conversation history keeps the
//! coordinator's answers with their reference tags; only the copy returned to
//! the user is expanded, by the [`ArtifactMiddleware`], once per answer.

use std::sync::Arc;

use async_trait::async_trait;
use coordination::{
    AnswerObserver, ArtifactMiddleware, FinalAnswerEvent, SharedArtifactStore,
};
use rig::completion::{Chat, Message};
use tracing::{debug, info};

use crate::agents::OaiAgent;
use crate::delegate::DelegateError;

/// Produces the coordinator's answer for one user turn.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn respond(&self, prompt: &str, history: Vec<Message>) -> Result<String, DelegateError>;
}

/// The rig coordinator agent as a planner.
pub struct AgentPlanner {
    agent: OaiAgent,
}

impl AgentPlanner {
    pub fn new(agent: OaiAgent) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl Planner for AgentPlanner {
    async fn respond(&self, prompt: &str, history: Vec<Message>) -> Result<String, DelegateError> {
        self.agent
            .chat(prompt, history)
            .await
            .map_err(|e| DelegateError::new("coordinator", e))
    }
}

/// A conversation with the coordinator.
pub struct CoordinatorSession {
    planner: Arc<dyn Planner>,
    store: SharedArtifactStore,
    middleware: ArtifactMiddleware,
    history: Vec<Message>,
}

impl CoordinatorSession {
    pub fn new(planner: Arc<dyn Planner>, store: SharedArtifactStore) -> Self {
        Self {
            planner,
            middleware: ArtifactMiddleware::new(store.clone()),
            store,
            history: Vec::new(),
        }
    }

    pub fn store(&self) -> &SharedArtifactStore {
        &self.store
    }

    /// Messages so far, with answers in their unexpanded form.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Run one user turn and return the answer as the user should see it.
    ///
    /// A planner failure leaves the history untouched.
    pub async fn turn(&mut self, user_message: &str) -> Result<String, DelegateError> {
        debug!(turn = self.history.len() / 2 + 1, "Coordinator turn");
        let answer = self
            .planner
            .respond(user_message, self.history.clone())
            .await?;

        self.history.push(Message::user(user_message));
        self.history.push(Message::assistant(answer.clone()));

        let mut event = FinalAnswerEvent::new(answer);
        self.middleware.on_final_answer(&mut event);

        info!(
            artifacts = self.store.len(),
            answer_chars = event.text.chars().count(),
            "Final answer delivered"
        );
        Ok(event.into_text())
    }
}
