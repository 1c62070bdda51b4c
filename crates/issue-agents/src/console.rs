//! Terminal input shared by the conversation loop and the approval prompt.
//!
//! Both read from one buffered line reader. A second reader on the same
//! stdin would miss lines the first one already buffered (piped input).

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::sync::Mutex;
use tracing::warn;

use crate::tracker::{ApprovalGate, IssueDraft};

/// Line reader over stdin (or any async reader in tests).
pub struct ConsoleInput<R = tokio::io::Stdin> {
    lines: Mutex<Lines<BufReader<R>>>,
}

impl ConsoleInput<tokio::io::Stdin> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

impl<R: AsyncRead + Unpin> ConsoleInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(BufReader::new(reader).lines()),
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Print `prompt` and read the next line. `None` at end of input.
    pub async fn read_line(&self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        self.lines.lock().await.next_line().await
    }
}

/// Asks on the terminal before every issue creation.
pub struct ConsoleApproval<R = tokio::io::Stdin> {
    input: Arc<ConsoleInput<R>>,
}

impl<R> ConsoleApproval<R> {
    pub fn new(input: Arc<ConsoleInput<R>>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send + 'static> ApprovalGate for ConsoleApproval<R> {
    async fn approve(&self, draft: &IssueDraft) -> bool {
        let prompt = format!("Create issue \"{}\"? [y/N] ", draft.title);
        match self.input.read_line(&prompt).await {
            Ok(Some(line)) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "Reading approval failed; declining");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> IssueDraft {
        IssueDraft {
            title: "[Bug]: Login crashes".into(),
            body: "body".into(),
            labels: vec![],
            issue_type: None,
        }
    }

    #[tokio::test]
    async fn test_piped_answer_reaches_approval() {
        let input = ConsoleInput::new(&b"file a bug\ny\nexit\n"[..]).shared();
        let approval = ConsoleApproval::new(input.clone());

        assert_eq!(input.read_line("> ").await.unwrap().as_deref(), Some("file a bug"));
        assert!(approval.approve(&draft()).await);
        assert_eq!(input.read_line("> ").await.unwrap().as_deref(), Some("exit"));
    }

    #[tokio::test]
    async fn test_approval_declines_on_other_answers_and_eof() {
        let input = ConsoleInput::new(&b"no\n YES \n"[..]).shared();
        let approval = ConsoleApproval::new(input);

        assert!(!approval.approve(&draft()).await);
        assert!(approval.approve(&draft()).await);
        assert!(!approval.approve(&draft()).await);
    }
}
