//! TF-IDF title strategies.
//!
//! ```text
//! idf(t) = ln((1 + n) / (1 + df(t))) + 1        (smoothed)
//! ```
//!
//! [`ClusterTfIdf`] fits the statistic on the cluster alone, so a term wins
//! by being frequent in a few members without being in all of them.
//! [`CorpusContrast`] counts document frequency over the whole corpus, so a
//! term wins by being frequent in the cluster and rare elsewhere.

use std::collections::{BTreeMap, BTreeSet};

use super::terms::candidates;
use super::{finish, TitleSynthesizer, MAX_TITLE_TERMS};

fn smoothed_idf(n_docs: usize, df: usize) -> f64 {
    ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}

fn term_counts(text: &str) -> BTreeMap<String, f64> {
    let mut counts = BTreeMap::new();
    for term in candidates(text) {
        *counts.entry(term).or_insert(0.0) += 1.0;
    }
    counts
}

/// TF-IDF fitted on the member texts, l2-normalized rows summed per term.
#[derive(Debug, Clone)]
pub struct ClusterTfIdf {
    max_terms: usize,
}

impl Default for ClusterTfIdf {
    fn default() -> Self {
        Self {
            max_terms: MAX_TITLE_TERMS,
        }
    }
}

impl ClusterTfIdf {
    /// Create with the default term count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of terms per title (1..=3).
    pub fn with_max_terms(mut self, n: usize) -> Self {
        self.max_terms = n.clamp(1, MAX_TITLE_TERMS);
        self
    }

    /// Summed TF-IDF score of every candidate term.
    pub fn rank(&self, texts: &[&str]) -> Vec<(String, f64)> {
        let rows: Vec<BTreeMap<String, f64>> = texts.iter().map(|t| term_counts(t)).collect();

        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for row in &rows {
            for term in row.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for row in &rows {
            let weighted: Vec<(&String, f64)> = row
                .iter()
                .map(|(term, tf)| {
                    let d = df.get(term.as_str()).copied().unwrap_or(0);
                    (term, tf * smoothed_idf(rows.len(), d))
                })
                .collect();
            let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm <= 0.0 {
                continue;
            }
            for (term, w) in weighted {
                *totals.entry(term.clone()).or_insert(0.0) += w / norm;
            }
        }
        totals.into_iter().collect()
    }
}

impl TitleSynthesizer for ClusterTfIdf {
    fn synthesize(&self, texts: &[&str]) -> String {
        finish(texts, self.rank(texts), self.max_terms)
    }
}

/// Cluster term frequency weighted by corpus-wide IDF.
#[derive(Debug, Clone)]
pub struct CorpusContrast {
    df: BTreeMap<String, usize>,
    n_docs: usize,
    max_terms: usize,
}

impl Default for CorpusContrast {
    fn default() -> Self {
        Self::fit::<&str>(&[])
    }
}

impl CorpusContrast {
    /// Learn document frequencies from the corpus texts.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut df = BTreeMap::new();
        for text in corpus {
            let unique: BTreeSet<String> = candidates(text.as_ref()).into_iter().collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }
        Self {
            df,
            n_docs: corpus.len(),
            max_terms: MAX_TITLE_TERMS,
        }
    }

    /// Set the number of terms per title (1..=3).
    pub fn with_max_terms(mut self, n: usize) -> Self {
        self.max_terms = n.clamp(1, MAX_TITLE_TERMS);
        self
    }

    /// Number of corpus documents the frequencies were learned from.
    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    /// Contrast score of every candidate term in the cluster.
    pub fn rank(&self, texts: &[&str]) -> Vec<(String, f64)> {
        let mut counts: BTreeMap<String, f64> = BTreeMap::new();
        for text in texts {
            for (term, c) in term_counts(text) {
                *counts.entry(term).or_insert(0.0) += c;
            }
        }
        let total: f64 = counts.values().sum();
        if total <= 0.0 {
            return Vec::new();
        }
        counts
            .into_iter()
            .map(|(term, c)| {
                let d = self.df.get(&term).copied().unwrap_or(0);
                let score = c / total * smoothed_idf(self.n_docs, d);
                (term, score)
            })
            .collect()
    }
}

impl TitleSynthesizer for CorpusContrast {
    fn synthesize(&self, texts: &[&str]) -> String {
        finish(texts, self.rank(texts), self.max_terms)
    }
}
