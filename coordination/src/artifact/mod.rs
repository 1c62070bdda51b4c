//! Immutable, session-scoped storage for large agent outputs.
//!
//! Agents pass bulky content (drafts, search results) to each other as short
//! reference tags instead of inline text. The content is resolved back only
//! at the outward boundary, when the coordinator's final answer is delivered.
//!
//! # Modules
//!
//! - [`store`]: `ArtifactStore`, append-only and shared per session
//! - [`reference`]: strict `<artifact id="..." />` tag grammar
//! - [`expand`]: single-pass, fail-open tag expansion
//! - [`envelope`]: `ARTIFACT_SUMMARY:` header parsing for producer output
//! - [`errors`]: `ArtifactError`

pub mod envelope;
pub mod errors;
pub mod expand;
pub mod reference;
pub mod store;

pub use envelope::{derive_summary, OutputEnvelope};
pub use errors::{ArtifactError, ArtifactResult};
pub use expand::{expand, expand_references, Expansion, ExpansionReport};
pub use reference::{contains_reference, scan, ReferenceTag, TagMatch};
pub use store::{Artifact, ArtifactId, ArtifactStore, SharedArtifactStore};
