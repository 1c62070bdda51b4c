//! Error taxonomy for the artifact layer.
//!
//! The artifact layer fails open: callers on the expansion path turn every
//! one of these into "keep the literal text". They exist so the two failure
//! modes stay distinguishable in logs and in [`ExpansionReport`].
//!
//! [`ExpansionReport`]: super::expand::ExpansionReport

use super::store::ArtifactId;

/// Errors produced by artifact lookups and reference parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    /// No artifact with this id was ever stored in this session.
    #[error("artifact `{0}` not found")]
    NotFound(ArtifactId),

    /// A reference-like string that does not parse as one complete tag.
    #[error("malformed artifact reference: {0}")]
    MalformedReference(String),
}

impl ArtifactError {
    /// Short machine-readable kind for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::MalformedReference(_) => "malformed_reference",
        }
    }
}

/// Result alias for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;
