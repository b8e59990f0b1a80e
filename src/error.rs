//! Error types for the metadata cache.

use graph_drive::error::GraphError;
use thiserror::Error;

/// Failure of a cache operation.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The path or id is absent locally, and absent remotely wherever a
    /// remote lookup was permitted.
    #[error("{0} not found in the local cache or on the remote")]
    NotFound(String),

    /// A remote call was needed but no credentials were available.
    #[error("no credentials available and children of {0} were not cached")]
    AuthRequired(String),

    /// The adapter failed; its message passes through verbatim.
    #[error(transparent)]
    Remote(#[from] GraphError),

    /// A detected invariant violation; the operation was aborted without
    /// mutating state.
    #[error("structural violation: {0}")]
    Structural(String),
}

impl CacheError {
    /// Whether this is the not-found case, for callers that treat absence
    /// as a non-error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
