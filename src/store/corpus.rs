//! Immutable corpus snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parallel `(id, text, vector)` lists for one build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    ids: Vec<String>,
    texts: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl Corpus {
    /// Validate and assemble a snapshot.
    ///
    /// Rejects lists of different lengths, vectors of different
    /// dimensions and repeated ids. An empty corpus is valid.
    pub fn new(ids: Vec<String>, texts: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if ids.len() != texts.len() || ids.len() != vectors.len() {
            return Err(Error::LengthMismatch {
                ids: ids.len(),
                texts: texts.len(),
                vectors: vectors.len(),
            });
        }
        if let Some(first) = vectors.first() {
            let d = first.len();
            if let Some(v) = vectors.iter().find(|v| v.len() != d) {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: v.len(),
                });
            }
        }
        let mut seen = HashSet::with_capacity(ids.len());
        for id in &ids {
            if !seen.insert(id.as_str()) {
                return Err(Error::DuplicateId(id.clone()));
            }
        }
        Ok(Self { ids, texts, vectors })
    }

    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if there are no documents.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Embedding dimension, `None` when empty.
    pub fn dim(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }

    /// Document ids.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Document texts.
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Embedding vectors.
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Vectors as borrowed slices, the form clustering takes.
    pub fn vector_refs(&self) -> Vec<&[f32]> {
        self.vectors.iter().map(Vec::as_slice).collect()
    }

    /// Index of a document by id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }

    /// The first `n` documents.
    pub fn truncated(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            ids: self.ids[..n].to_vec(),
            texts: self.texts[..n].to_vec(),
            vectors: self.vectors[..n].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_corpus() {
        let c = Corpus::new(
            strings(&["a", "b"]),
            strings(&["ta", "tb"]),
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.dim(), Some(2));
        assert_eq!(c.position("b"), Some(1));
        assert_eq!(c.vector_refs()[1], &[0.0, 1.0]);
    }

    #[test]
    fn test_empty_corpus_is_valid() {
        let c = Corpus::new(Vec::new(), Vec::new(), Vec::new()).unwrap();
        assert!(c.is_empty());
        assert_eq!(c.dim(), None);
        assert_eq!(c, Corpus::empty());
    }

    #[test]
    fn test_rejects_bad_input() {
        let err = Corpus::new(strings(&["a"]), strings(&[]), vec![vec![1.0]]).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { ids: 1, texts: 0, vectors: 1 }));

        let err = Corpus::new(
            strings(&["a", "b"]),
            strings(&["x", "y"]),
            vec![vec![1.0, 0.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, found: 1 }));

        let err = Corpus::new(
            strings(&["a", "a"]),
            strings(&["x", "y"]),
            vec![vec![1.0], vec![2.0]],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_truncated() {
        let c = Corpus::new(
            strings(&["a", "b", "c"]),
            strings(&["x", "y", "z"]),
            vec![vec![1.0], vec![2.0], vec![3.0]],
        )
        .unwrap();
        let t = c.truncated(2);
        assert_eq!(t.ids(), &["a", "b"]);
        assert_eq!(c.truncated(10).len(), 3);
    }
}
