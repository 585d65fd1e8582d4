//! Embedding store boundary.
//!
//! The store owns document texts and their embeddings. The outline
//! pipeline only reads a [`Corpus`] snapshot from it and asks for nearest
//! neighbors; computing real embeddings is the store's business.
//!
//! | Type | Role |
//! |------|------|
//! | [`EmbeddingStore`] | the boundary trait |
//! | [`MemoryStore`] | in-memory implementation over an [`Embedder`] |
//! | [`HashEmbedder`] | token-hashing embedder for tests and demos |
//! | [`IndexWriter`] | best-effort background writes with a deadline (`writer` feature) |

mod corpus;
mod memory;
#[cfg(feature = "writer")]
mod writer;

pub use corpus::Corpus;
pub use memory::{Embedder, HashEmbedder, MemoryStore};
#[cfg(feature = "writer")]
pub use writer::{IndexWriter, PendingWrite, WriteOp, DEFAULT_WRITE_TIMEOUT};

use std::sync::Arc;

use crate::error::Result;

/// Storage and similarity lookup for embedded documents.
pub trait EmbeddingStore: Send + Sync {
    /// Add a new document. Fails with `Conflict` if the id exists.
    fn insert(&self, id: &str, text: &str) -> Result<()>;

    /// Replace a document's text. Fails with `NotFound` if absent.
    fn update(&self, id: &str, text: &str) -> Result<()>;

    /// Delete a document. Fails with `NotFound` if absent.
    fn remove(&self, id: &str) -> Result<()>;

    /// The `k` documents most similar to `text`, most similar first, as
    /// `(id, stored text)` pairs.
    fn query_similar(&self, text: &str, k: usize) -> Result<Vec<(String, String)>>;

    /// Snapshot of at most `limit` documents.
    fn get_all(&self, limit: usize) -> Result<Corpus>;

    /// Stored embedding of one document, when the store exposes it.
    fn vector(&self, id: &str) -> Result<Option<Vec<f32>>> {
        let _ = id;
        Ok(None)
    }
}

impl<T: EmbeddingStore + ?Sized> EmbeddingStore for Arc<T> {
    fn insert(&self, id: &str, text: &str) -> Result<()> {
        (**self).insert(id, text)
    }

    fn update(&self, id: &str, text: &str) -> Result<()> {
        (**self).update(id, text)
    }

    fn remove(&self, id: &str) -> Result<()> {
        (**self).remove(id)
    }

    fn query_similar(&self, text: &str, k: usize) -> Result<Vec<(String, String)>> {
        (**self).query_similar(text, k)
    }

    fn get_all(&self, limit: usize) -> Result<Corpus> {
        (**self).get_all(limit)
    }

    fn vector(&self, id: &str) -> Result<Option<Vec<f32>>> {
        (**self).vector(id)
    }
}
