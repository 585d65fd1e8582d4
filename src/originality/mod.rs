//! Originality: how semantically distinct a document or cluster is.
//!
//! Scores live in `[0, 1]`. The corpus strategy ranks outliers highest;
//! the local rule maps the neighborhood distance through `1 - d`, so a
//! document with identical neighbors scores 1.0 and one whose neighbors are
//! maximally distant scores 0.0.
//!
//! # Strategies
//!
//! | Strategy | Input | Computation |
//! |----------|-------|-------------|
//! | [`Strategy::Corpus`] | whole corpus, once per rebuild | Laplacian eigenmap → LOF → min–max |
//! | [`Strategy::Local`] | any set | `1 -` mean cosine distance to the k nearest others |
//!
//! The corpus strategy falls back to the local one when the corpus is too
//! small for the reduction or the outlier factors are degenerate (e.g. all
//! documents identical).
//!
//! # Cluster Aggregation
//!
//! | [`Aggregation`] | Heading score |
//! |-----------------|---------------|
//! | `CentroidNovelty` | cluster mean vector vs. all non-members (k-nearest rule) |
//! | `MeanOfMembers` | arithmetic mean of member document scores |
//!
//! `CentroidNovelty` falls back to the member mean when there are no
//! non-members to compare against.

mod lof;
mod local;
mod reduce;

pub use lof::{local_outlier_factor, min_max_normalize};
pub use local::{centroid_novelty, local_scores, novelty_against, NO_NEIGHBOR_SCORE};
pub use reduce::{spectral_reduce, ReduceConfig};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// How per-document scores are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Neighborhood-preserving reduction plus local outlier factor.
    #[default]
    Corpus,
    /// k-nearest mean cosine distance.
    Local,
}

/// How a heading's score is derived from its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Novelty of the cluster centroid against every non-member document.
    #[default]
    CentroidNovelty,
    /// Mean of the member documents' scores.
    MeanOfMembers,
}

/// Configuration for originality scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginalityConfig {
    /// Per-document strategy.
    pub strategy: Strategy,
    /// Neighbors in the reduction graph and the outlier factor.
    pub n_neighbors: usize,
    /// Dimensionality of the reduced space.
    pub n_components: usize,
    /// Neighbors averaged by the local rule.
    pub local_k: usize,
    /// Heading aggregation rule.
    pub aggregation: Aggregation,
    /// Seed for the reduction's starting basis.
    pub seed: u64,
}

impl Default for OriginalityConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Corpus,
            n_neighbors: 15,
            n_components: 5,
            local_k: 5,
            aggregation: Aggregation::CentroidNovelty,
            seed: 42,
        }
    }
}

impl OriginalityConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-document strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the heading aggregation rule.
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Set the reduction neighbor count.
    pub fn with_n_neighbors(mut self, n: usize) -> Self {
        self.n_neighbors = n;
        self
    }

    /// Set the reduced dimensionality.
    pub fn with_n_components(mut self, n: usize) -> Self {
        self.n_components = n;
        self
    }

    /// Set the local-rule neighbor count.
    pub fn with_local_k(mut self, k: usize) -> Self {
        self.local_k = k;
        self
    }
}

/// Per-document scores for a whole corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusScores {
    /// One score per document, in input order.
    pub scores: Vec<f32>,
    /// Strategy that produced the scores (after any fallback).
    pub strategy: Strategy,
    /// Reduced coordinates, when the corpus strategy ran.
    pub projection: Option<Vec<Vec<f32>>>,
}

/// Computes document and cluster originality.
#[derive(Debug, Clone, Default)]
pub struct OriginalityScorer {
    config: OriginalityConfig,
}

impl OriginalityScorer {
    /// Create a scorer.
    pub fn new(config: OriginalityConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &OriginalityConfig {
        &self.config
    }

    /// Score every document of the corpus.
    pub fn score_corpus(&self, vectors: &[&[f32]]) -> CorpusScores {
        if self.config.strategy == Strategy::Corpus {
            if let Some(scored) = self.corpus_level(vectors) {
                return scored;
            }
            debug!(
                n_docs = vectors.len(),
                "corpus-level originality unavailable, using local rule"
            );
        }
        CorpusScores {
            scores: local_scores(vectors, self.config.local_k),
            strategy: Strategy::Local,
            projection: None,
        }
    }

    fn corpus_level(&self, vectors: &[&[f32]]) -> Option<CorpusScores> {
        // Coincident documents give the reduction a degenerate eigenspace.
        if coincident(vectors) {
            return None;
        }
        let reduce_config = ReduceConfig {
            n_neighbors: self.config.n_neighbors,
            n_components: self.config.n_components,
            seed: self.config.seed,
        };
        let reduced = match spectral_reduce(vectors, &reduce_config) {
            Ok(reduced) => reduced,
            Err(err) => {
                debug!(error = %err, "spectral reduction skipped");
                return None;
            }
        };
        let factors = local_outlier_factor(&reduced, self.config.n_neighbors);
        let scores = min_max_normalize(&factors)?;
        let projection = reduced
            .into_iter()
            .map(|row| row.into_iter().map(|x| x as f32).collect())
            .collect();
        Some(CorpusScores {
            scores,
            strategy: Strategy::Corpus,
            projection: Some(projection),
        })
    }

    /// Score of a cluster.
    ///
    /// `members` index into `corpus`; `member_scores` are the members'
    /// document scores in the same order.
    pub fn score_cluster(&self, members: &[usize], corpus: &[&[f32]], member_scores: &[f32]) -> f32 {
        let centroid = match self.config.aggregation {
            Aggregation::CentroidNovelty => centroid_novelty(members, corpus, self.config.local_k),
            Aggregation::MeanOfMembers => None,
        };
        centroid.unwrap_or_else(|| mean_score(member_scores))
    }
}

fn coincident(vectors: &[&[f32]]) -> bool {
    match vectors.split_first() {
        Some((first, rest)) => rest
            .iter()
            .all(|v| crate::distance::cosine_distance(first, v) < 1e-6),
        None => true,
    }
}

/// Mean of scores, [`NO_NEIGHBOR_SCORE`] for none; clamped to `[0, 1]`.
pub fn mean_score(scores: &[f32]) -> f32 {
    if scores.is_empty() {
        return NO_NEIGHBOR_SCORE;
    }
    let sum: f64 = scores.iter().map(|s| *s as f64).sum();
    let mean = (sum / scores.len() as f64) as f32;
    if mean.is_finite() {
        mean.clamp(0.0, 1.0)
    } else {
        NO_NEIGHBOR_SCORE
    }
}
