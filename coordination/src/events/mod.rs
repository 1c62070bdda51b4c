//! Typed final-answer notification and its observers.
//!
//! The coordinator session fires exactly one [`FinalAnswerEvent`] per answer,
//! right before delivery. [`ArtifactMiddleware`] observes it and expands
//! reference tags into content.
//!
//! ```text
//! ┌──────────────┐  FinalAnswerEvent  ┌────────────────────┐   expanded text  ┌──────┐
//! │ Coordinator  │───────────────────▶│ ArtifactMiddleware │─────────────────▶│ User │
//! └──────────────┘                    └─────────┬──────────┘                  └──────┘
//!                                               │ get(id)
//!                                               ▼
//!                                        ┌───────────────┐
//!                                        │ ArtifactStore │
//!                                        └───────────────┘
//! ```

pub mod middleware;
pub mod types;

pub use middleware::ArtifactMiddleware;
pub use types::{AnswerObserver, FinalAnswerEvent};
