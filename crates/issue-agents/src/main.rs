//! Interactive issue drafting against a GitHub repository.
//!
//! # Usage
//!
//! ```bash
//! # One turn
//! issue-agents --prompt "Login page crashes when the password field is empty"
//!
//! # Conversation on stdin, auto-approving issue creation
//! GITHUB_REPOSITORY=acme/widgets issue-agents --yes
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use issue_agents::agents::AgentFactory;
use issue_agents::config::{check_endpoint, IssueConfig};
use issue_agents::console::{ConsoleApproval, ConsoleInput};
use issue_agents::session::CoordinatorSession;
use issue_agents::tracker::{ApprovalGate, AutoApprove, GithubTracker};
use tracing::{info, warn};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run a single turn with this message and exit
    #[arg(long)]
    prompt: Option<String>,

    /// Target repository as owner/name (overrides GITHUB_REPOSITORY)
    #[arg(long)]
    repository: Option<String>,

    /// Create issues without asking for confirmation
    #[arg(long, default_value_t = false)]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = IssueConfig::from_env().context("Failed to load configuration")?;
    if let Some(repository) = &args.repository {
        config = config.with_repository(repository)?;
    }

    info!(
        llm = %config.llm.url,
        model = %config.llm.model,
        repository = %config.github.repository,
        "Issue agents starting"
    );

    if !check_endpoint(&config.llm.url).await {
        warn!(url = %config.llm.url, "Inference endpoint did not answer /models; continuing anyway");
    }

    let tracker = GithubTracker::new(config.github.clone()).context("Failed to build GitHub client")?;
    let input = ConsoleInput::stdin().shared();
    let approval: Arc<dyn ApprovalGate> = if args.yes {
        Arc::new(AutoApprove)
    } else {
        Arc::new(ConsoleApproval::new(input.clone()))
    };

    let factory = AgentFactory::new(&config, Arc::new(tracker), approval)?;
    let mut session = factory.start_session().await;

    match args.prompt {
        Some(prompt) => {
            let answer = session.turn(&prompt).await?;
            println!("{answer}");
        }
        None => repl(&mut session, &input).await?,
    }

    Ok(())
}

/// Read user messages line by line until EOF or `exit`.
///
/// Approval prompts read from the same `input`, so piped answers line up.
async fn repl(session: &mut CoordinatorSession, input: &ConsoleInput) -> Result<()> {
    loop {
        let Some(line) = input.read_line("> ").await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        match session.turn(line).await {
            Ok(answer) => println!("\n{answer}\n"),
            Err(err) => warn!(error = %err, "Coordinator turn failed"),
        }
    }
    info!(artifacts = session.store().len(), "Session ended");
    Ok(())
}
