use std::time::Duration;

use thiserror::Error;

/// Result alias for `ideatree`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the outline pipeline and its store/cache boundaries.
///
/// Degenerate inputs (empty clusters, identical vectors, texts without usable
/// terms) are never reported here; they resolve to fallback values locally.
#[derive(Debug, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Vector dimension mismatch.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// The parallel id/text/vector lists of a corpus differ in length.
    #[error("corpus length mismatch: {ids} ids, {texts} texts, {vectors} vectors")]
    LengthMismatch {
        /// Number of ids.
        ids: usize,
        /// Number of texts.
        texts: usize,
        /// Number of vectors.
        vectors: usize,
    },

    /// A document id appears twice in one corpus.
    #[error("duplicate document id: {0}")]
    DuplicateId(String),

    /// Invalid number of clusters requested.
    #[error("cannot create {requested} clusters from {n_items} items")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Document not present in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// Document already present in the store.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The embedding store could not serve the request.
    #[error("embedding store unavailable: {0}")]
    Store(String),

    /// A background write did not finish within its deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Filesystem failure, e.g. while writing the outline cache.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Outline (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
