//! Artifact handoff core for multi-agent issue drafting.
//!
//! This library provides the deterministic pieces that sit between agents:
//! - [`artifact`]: an append-only, session-scoped store for large agent
//!   outputs, the `<artifact id="..." />` reference grammar and single-pass
//!   expansion
//! - [`events`]: the typed final-answer event and the middleware that expands
//!   references at the outward boundary
//!
//! Nothing here talks to a model. The agent crate wires these into rig tools
//! and the coordinator session.
//!
//! # Usage
//!
//! ```
//! use coordination::artifact::ArtifactStore;
//! use coordination::events::{AnswerObserver, ArtifactMiddleware, FinalAnswerEvent};
//!
//! let store = ArtifactStore::new().shared();
//! let id = store.put("Fix the crash in login.", "bug draft");
//!
//! let middleware = ArtifactMiddleware::new(store.clone());
//! let mut event = FinalAnswerEvent::new(format!("Here is the draft: <artifact id=\"{id}\" />"));
//! middleware.on_final_answer(&mut event);
//! assert_eq!(event.text, "Here is the draft: Fix the crash in login.");
//! ```

pub mod artifact;
pub mod events;

pub use artifact::{
    contains_reference, expand, expand_references, scan, Artifact, ArtifactError, ArtifactId,
    ArtifactResult, ArtifactStore, Expansion, ExpansionReport, OutputEnvelope, ReferenceTag,
    SharedArtifactStore,
};
pub use events::{AnswerObserver, ArtifactMiddleware, FinalAnswerEvent};
