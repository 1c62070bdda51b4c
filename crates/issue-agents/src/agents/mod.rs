//! Agent builders for the issue-drafting team.
//!
//! Each agent is built via a free function that returns `OaiAgent`.
//! The `AgentFactory` ties them together using `IssueConfig` and the tracker.

pub mod analyst;
pub mod coordinator;
pub mod writer;

use std::sync::Arc;

use anyhow::Result;
use coordination::{ArtifactStore, SharedArtifactStore};
use rig::agent::Agent;
use rig::providers::openai;
use tracing::info;

use crate::config::IssueConfig;
use crate::delegate::AgentDelegate;
use crate::prompts;
use crate::session::{AgentPlanner, CoordinatorSession};
use crate::templates::WriterContext;
use crate::tools::bundles::CoordinatorWiring;
use crate::tracker::{issue_types_or_default, labels_or_empty, ApprovalGate, IssueTracker};

/// Type alias for agents built from OpenAI-compatible endpoints.
pub type OaiAgent = Agent<openai::completion::CompletionModel>;

/// Factory that builds all agents from an `IssueConfig`.
pub struct AgentFactory {
    pub client: openai::CompletionsClient,
    pub config: IssueConfig,
    tracker: Arc<dyn IssueTracker>,
    approval: Arc<dyn ApprovalGate>,
}

impl AgentFactory {
    pub fn new(
        config: &IssueConfig,
        tracker: Arc<dyn IssueTracker>,
        approval: Arc<dyn ApprovalGate>,
    ) -> Result<Self> {
        Ok(Self {
            client: config.completions_client()?,
            config: config.clone(),
            tracker,
            approval,
        })
    }

    /// Build the technical writer. No tools.
    pub fn build_writer(&self, ctx: &WriterContext) -> OaiAgent {
        writer::build_writer(&self.client, &self.config.llm.model, ctx)
    }

    /// Build the duplicate-search analyst.
    pub fn build_analyst(&self) -> OaiAgent {
        analyst::build_analyst(
            &self.client,
            &self.config.llm.model,
            self.tracker.clone(),
            self.config.max_turns,
        )
    }

    /// Build the coordinator with writer and analyst behind handoff tools
    /// sharing `store`.
    ///
    /// Issue types and labels are fetched once here and rendered into the
    /// preamble.
    pub async fn build_coordinator(&self, store: SharedArtifactStore) -> OaiAgent {
        let ctx = WriterContext::load(&self.config).await;
        let writer = AgentDelegate::new("writer", self.build_writer(&ctx));
        let analyst = AgentDelegate::new("analyst", self.build_analyst());

        let issue_types = issue_types_or_default(self.tracker.as_ref()).await;
        let labels = labels_or_empty(self.tracker.as_ref()).await;

        info!(
            repository = %self.config.github.repository,
            issue_types = issue_types.len(),
            labels = labels.len(),
            prompt_version = prompts::PROMPT_VERSION,
            "Building coordinator"
        );

        coordinator::build_coordinator(
            &self.client,
            &self.config.llm.model,
            &coordinator::CoordinatorContext {
                repository: self.config.github.repository.clone(),
                issue_types,
                labels,
            },
            CoordinatorWiring {
                writer: Arc::new(writer),
                analyst: Arc::new(analyst),
                tracker: self.tracker.clone(),
                approval: self.approval.clone(),
                store,
            },
            self.config.max_turns,
        )
    }

    /// Start a conversation with its own artifact store.
    pub async fn start_session(&self) -> CoordinatorSession {
        let store = ArtifactStore::new().shared();
        let coordinator = self.build_coordinator(store.clone()).await;
        CoordinatorSession::new(Arc::new(AgentPlanner::new(coordinator)), store)
    }
}
