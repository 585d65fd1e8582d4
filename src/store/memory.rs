//! In-memory embedding store.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::{Corpus, EmbeddingStore};
use crate::distance::cosine_distance;
use crate::error::{Error, Result};
use crate::summarize::normalize;

/// Turns document text into an embedding vector.
pub trait Embedder: Send + Sync {
    /// Embed one text.
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Feature-hashing bag-of-words embedder.
///
/// Each normalized token is hashed (FNV-1a) into one of `dim` buckets with
/// a hash-derived sign; the result is l2-normalized. Texts with no tokens
/// embed to the zero vector. Good enough for tests and demos, where
/// documents sharing words should land near each other.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dim: 256 }
    }
}

impl HashEmbedder {
    /// Create an embedder with `dim` buckets (at least 1).
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    /// Output dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        for token in normalize(text).split_whitespace() {
            let h = fnv1a(token.as_bytes());
            let bucket = (h % self.dim as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

#[derive(Debug, Clone)]
struct StoredDoc {
    text: String,
    vector: Vec<f32>,
}

/// Embedding store held in memory, iterated in id order.
#[derive(Debug)]
pub struct MemoryStore<E = HashEmbedder> {
    embedder: E,
    docs: RwLock<BTreeMap<String, StoredDoc>>,
}

impl Default for MemoryStore<HashEmbedder> {
    fn default() -> Self {
        Self::new(HashEmbedder::default())
    }
}

impl<E: Embedder> MemoryStore<E> {
    /// Create an empty store.
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            docs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.read().map(|docs| docs.len()).unwrap_or(0)
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored text of a document.
    pub fn text(&self, id: &str) -> Result<Option<String>> {
        Ok(self.read()?.get(id).map(|d| d.text.clone()))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, StoredDoc>>> {
        self.docs
            .read()
            .map_err(|_| Error::Store("document lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, StoredDoc>>> {
        self.docs
            .write()
            .map_err(|_| Error::Store("document lock poisoned".into()))
    }

    fn embed(&self, text: &str) -> StoredDoc {
        StoredDoc {
            text: text.to_string(),
            vector: self.embedder.embed(text),
        }
    }
}

impl<E: Embedder> EmbeddingStore for MemoryStore<E> {
    fn insert(&self, id: &str, text: &str) -> Result<()> {
        let doc = self.embed(text);
        let mut docs = self.write()?;
        if docs.contains_key(id) {
            return Err(Error::Conflict(id.to_string()));
        }
        docs.insert(id.to_string(), doc);
        debug!(id, "document inserted");
        Ok(())
    }

    fn update(&self, id: &str, text: &str) -> Result<()> {
        let doc = self.embed(text);
        let mut docs = self.write()?;
        match docs.get_mut(id) {
            Some(slot) => {
                *slot = doc;
                debug!(id, "document updated");
                Ok(())
            }
            None => Err(Error::NotFound(id.to_string())),
        }
    }

    fn remove(&self, id: &str) -> Result<()> {
        match self.write()?.remove(id) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(id.to_string())),
        }
    }

    fn query_similar(&self, text: &str, k: usize) -> Result<Vec<(String, String)>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let query = self.embedder.embed(text);
        let docs = self.read()?;
        let mut scored: Vec<(f32, &String, &StoredDoc)> = docs
            .iter()
            .map(|(id, doc)| (cosine_distance(&query, &doc.vector), id, doc))
            .collect();
        // BTreeMap order makes equal distances resolve by id.
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, id, doc)| (id.clone(), doc.text.clone()))
            .collect())
    }

    fn get_all(&self, limit: usize) -> Result<Corpus> {
        let docs = self.read()?;
        let mut ids = Vec::new();
        let mut texts = Vec::new();
        let mut vectors = Vec::new();
        for (id, doc) in docs.iter().take(limit) {
            ids.push(id.clone());
            texts.push(doc.text.clone());
            vectors.push(doc.vector.clone());
        }
        Corpus::new(ids, texts, vectors)
    }

    fn vector(&self, id: &str) -> Result<Option<Vec<f32>>> {
        Ok(self.read()?.get(id).map(|d| d.vector.clone()))
    }
}
