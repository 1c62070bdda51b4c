//! Event types for the coordinator's outward boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The coordinator produced an answer that is about to be delivered to the
/// user. Observers may rewrite `text` in place before delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalAnswerEvent {
    pub text: String,
    pub produced_at: DateTime<Utc>,
}

impl FinalAnswerEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            produced_at: Utc::now(),
        }
    }

    /// Consume the event and return the (possibly rewritten) text.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Observer of final answers.
///
/// Called once per answer, synchronously, before the answer leaves the
/// system.
pub trait AnswerObserver: Send + Sync {
    fn on_final_answer(&self, event: &mut FinalAnswerEvent);
}
