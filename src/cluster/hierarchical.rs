//! Hierarchical (agglomerative) clustering over cosine distance.
//!
//! Bottom-up clustering that builds a **dendrogram** by iteratively
//! merging the closest clusters, then stops once `k` clusters remain.
//!
//! # Linkage Methods
//!
//! The key choice: how do we define "distance between clusters"?
//!
//! | Linkage | Formula | Effect |
//! |---------|---------|--------|
//! | Single | min(d(a,b)) for a∈A, b∈B | Chaining; elongated clusters |
//! | Complete | max(d(a,b)) | Compact clusters |
//! | Average | mean(d(a,b)) | Balanced compromise |
//!
//! Embeddings are compared by cosine distance, so Ward (which assumes
//! Euclidean geometry) is not offered. Average linkage is the default and
//! what the outline builder uses.

use super::dendrogram::Dendrogram;
use super::traits::Clustering;
use crate::distance::condensed_cosine;
use crate::error::{Error, Result};
use kodama::{linkage as kodama_linkage, Method as KodamaMethod};

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage: mean distance between clusters.
    #[default]
    Average,
}

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone)]
pub struct HierarchicalClustering {
    /// Number of clusters to produce.
    n_clusters: usize,
    /// Linkage method.
    linkage: Linkage,
}

impl HierarchicalClustering {
    /// Create a new hierarchical clusterer.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            linkage: Linkage::Average,
        }
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Fit and return the full dendrogram.
    pub fn fit_dendrogram(&self, data: &[&[f32]]) -> Result<Dendrogram> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = data.len();
        let d = data[0].len();
        if let Some(p) = data.iter().find(|p| p.len() != d) {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: p.len(),
            });
        }

        let mut dendro = Dendrogram::new(n);
        if n == 1 {
            return Ok(dendro);
        }

        let mut condensed = condensed_cosine(data);

        let method = match self.linkage {
            Linkage::Single => KodamaMethod::Single,
            Linkage::Complete => KodamaMethod::Complete,
            Linkage::Average => KodamaMethod::Average,
        };

        // kodama labels leaves 0..n-1; each merge i creates cluster n+i.
        let dend = kodama_linkage(&mut condensed, n, method);
        for step in dend.steps() {
            dendro.add_merge(step.cluster1, step.cluster2, step.dissimilarity, step.size);
        }

        Ok(dendro)
    }
}

impl Clustering for HierarchicalClustering {
    fn fit_predict(&self, data: &[&[f32]]) -> Result<Vec<usize>> {
        if self.n_clusters == 0 || self.n_clusters > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: data.len(),
            });
        }
        let dendro = self.fit_dendrogram(data)?;
        Ok(dendro.cut_to_k(self.n_clusters))
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}
