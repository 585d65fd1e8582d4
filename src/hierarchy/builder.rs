//! Recursive outline construction.
//!
//! ```text
//! grow(members, level):
//!     |members| <= 2 or level > max_depth  →  one Leaf per member
//!     otherwise:
//!         k      = max(2, round(sqrt(n)))
//!         groups = average-linkage cut into k, labeled by first appearance
//!         for each group, in label order:
//!             Heading { title(group texts), level,
//!                       children = grow(group, level + 1),
//!                       originality(group) }
//! ```
//!
//! Per-document originality is computed once for the whole corpus before
//! the recursion and threaded through it; headings aggregate from it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::{BuildConfig, TitleStrategy};
use super::node::{leaf_ids, TreeNode};
use crate::cluster::{branching_factor, Clustering, HierarchicalClustering};
use crate::error::Result;
use crate::originality::{OriginalityScorer, Strategy};
use crate::store::Corpus;
use crate::summarize::{ClusterTfIdf, CorpusContrast, TitleSynthesizer};

/// Summary numbers for one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Documents placed in the outline.
    pub n_documents: usize,
    /// Documents dropped by the `max_items` cap.
    pub n_truncated: usize,
    /// Heading nodes created.
    pub n_headings: usize,
    /// Deepest heading level (0 when there are no headings).
    pub depth: usize,
    /// Depth bound the build ran with.
    pub max_depth: usize,
    /// Per-document originality strategy that actually ran.
    pub strategy: Strategy,
}

/// Result of one build.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    /// Top-level node sequence.
    pub nodes: Vec<TreeNode>,
    /// Ids of the documents placed, in corpus order.
    pub ids: Vec<String>,
    /// Originality per document, parallel to `ids`.
    pub originality: Vec<f32>,
    /// Reduced coordinates when the corpus-level strategy ran.
    pub projection: Option<Vec<Vec<f32>>>,
    /// Build statistics.
    pub stats: BuildStats,
}

impl Outline {
    /// Ids of every leaf, depth-first.
    pub fn leaf_ids(&self) -> Vec<&str> {
        leaf_ids(&self.nodes)
    }

    /// Take the node sequence, e.g. for caching.
    pub fn into_nodes(self) -> Vec<TreeNode> {
        self.nodes
    }
}

/// Builds outlines from corpus snapshots.
pub struct OutlineBuilder {
    config: BuildConfig,
    titler: Option<Box<dyn TitleSynthesizer + Send + Sync>>,
}

impl std::fmt::Debug for OutlineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineBuilder")
            .field("config", &self.config)
            .field("custom_titler", &self.titler.is_some())
            .finish()
    }
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new(BuildConfig::default())
    }
}

impl OutlineBuilder {
    /// Create a builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            titler: None,
        }
    }

    /// Use a custom title synthesizer instead of `config.titles`.
    pub fn with_titler<T>(mut self, titler: T) -> Self
    where
        T: TitleSynthesizer + Send + Sync + 'static,
    {
        self.titler = Some(Box::new(titler));
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the outline of a corpus.
    pub fn build(&self, corpus: &Corpus) -> Result<Outline> {
        let n_truncated = corpus.len().saturating_sub(self.config.max_items);
        let capped;
        let corpus = if n_truncated > 0 {
            warn!(
                n_docs = corpus.len(),
                max_items = self.config.max_items,
                "corpus exceeds max_items, truncating"
            );
            capped = corpus.truncated(self.config.max_items);
            &capped
        } else {
            corpus
        };

        info!(
            n_docs = corpus.len(),
            max_depth = self.config.max_depth,
            "building outline"
        );

        let vectors = corpus.vector_refs();
        let texts: Vec<&str> = corpus.texts().iter().map(String::as_str).collect();

        let scorer = OriginalityScorer::new(self.config.originality.clone());
        let scored = scorer.score_corpus(&vectors);

        let fitted: Box<dyn TitleSynthesizer>;
        let titler: &dyn TitleSynthesizer = match &self.titler {
            Some(custom) => custom.as_ref(),
            None => {
                fitted = match self.config.titles {
                    TitleStrategy::ClusterTfIdf => {
                        Box::new(ClusterTfIdf::new().with_max_terms(self.config.title_terms))
                    }
                    TitleStrategy::CorpusContrast => Box::new(
                        CorpusContrast::fit(&texts).with_max_terms(self.config.title_terms),
                    ),
                };
                fitted.as_ref()
            }
        };

        let grower = Grower {
            ids: corpus.ids(),
            texts: &texts,
            vectors: &vectors,
            scores: &scored.scores,
            scorer: &scorer,
            titler,
            max_depth: self.config.max_depth,
        };
        let all: Vec<usize> = (0..corpus.len()).collect();
        let nodes = grower.grow(&all, 1)?;

        let n_headings = nodes.iter().map(count_headings).sum();
        let depth = nodes.iter().map(TreeNode::max_level).max().unwrap_or(0);
        let stats = BuildStats {
            n_documents: corpus.len(),
            n_truncated,
            n_headings,
            depth,
            max_depth: self.config.max_depth,
            strategy: scored.strategy,
        };
        info!(
            n_docs = stats.n_documents,
            n_headings = stats.n_headings,
            depth = stats.depth,
            strategy = ?stats.strategy,
            "outline built"
        );

        Ok(Outline {
            nodes,
            ids: corpus.ids().to_vec(),
            originality: scored.scores,
            projection: scored.projection,
            stats,
        })
    }
}

fn count_headings(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 0,
        TreeNode::Heading { children, .. } => 1 + children.iter().map(count_headings).sum::<usize>(),
    }
}

/// Borrowed state shared by every recursive call.
struct Grower<'a> {
    ids: &'a [String],
    texts: &'a [&'a str],
    vectors: &'a [&'a [f32]],
    scores: &'a [f32],
    scorer: &'a OriginalityScorer,
    titler: &'a dyn TitleSynthesizer,
    max_depth: usize,
}

impl Grower<'_> {
    fn grow(&self, members: &[usize], level: usize) -> Result<Vec<TreeNode>> {
        if members.len() <= 2 || level > self.max_depth {
            return Ok(members.iter().map(|&i| self.leaf(i)).collect());
        }

        let k = branching_factor(members.len());
        let member_vectors: Vec<&[f32]> = members.iter().map(|&i| self.vectors[i]).collect();
        let groups = HierarchicalClustering::new(k).partition(members, &member_vectors)?;
        debug!(level, n_items = members.len(), k, n_groups = groups.len(), "clustered");

        let mut nodes = Vec::with_capacity(groups.len());
        for group in groups {
            let group_texts: Vec<&str> = group.iter().map(|&i| self.texts[i]).collect();
            let title = self.titler.synthesize(&group_texts);
            let children = self.grow(&group, level + 1)?;
            let member_scores: Vec<f32> = group.iter().map(|&i| self.scores[i]).collect();
            let originality = self
                .scorer
                .score_cluster(&group, self.vectors, &member_scores);
            nodes.push(TreeNode::heading(title, level, children, originality));
        }
        Ok(nodes)
    }

    fn leaf(&self, i: usize) -> TreeNode {
        TreeNode::leaf(self.ids[i].clone(), self.texts[i], self.scores[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::originality::{self, OriginalityConfig};
    use crate::summarize::{from_fn, UNTITLED};
    use proptest::prelude::*;
    use proptest::strategy::Strategy;
    use std::collections::BTreeSet;

    fn corpus(docs: &[(&str, &str, Vec<f32>)]) -> Corpus {
        Corpus::new(
            docs.iter().map(|d| d.0.to_string()).collect(),
            docs.iter().map(|d| d.1.to_string()).collect(),
            docs.iter().map(|d| d.2.clone()).collect(),
        )
        .unwrap()
    }

    fn headings(nodes: &[TreeNode]) -> Vec<&TreeNode> {
        nodes.iter().filter(|n| !n.is_leaf()).collect()
    }

    #[test]
    fn test_empty_corpus() {
        let outline = OutlineBuilder::default().build(&Corpus::empty()).unwrap();
        assert!(outline.nodes.is_empty());
        assert_eq!(outline.stats.n_documents, 0);
        assert_eq!(outline.stats.depth, 0);
    }

    #[test]
    fn test_one_and_two_documents_are_flat() {
        let one = corpus(&[("a", "alpha idea", vec![1.0, 0.0])]);
        let outline = OutlineBuilder::default().build(&one).unwrap();
        assert_eq!(outline.nodes.len(), 1);
        assert!(outline.nodes[0].is_leaf());
        assert_eq!(outline.nodes[0].originality(), 1.0);

        let two = corpus(&[
            ("a", "alpha idea", vec![1.0, 0.0]),
            ("b", "beta idea", vec![0.0, 1.0]),
        ]);
        let outline = OutlineBuilder::default().build(&two).unwrap();
        assert_eq!(outline.nodes.len(), 2);
        assert!(outline.nodes.iter().all(TreeNode::is_leaf));
    }

    #[test]
    fn test_identical_documents_score_one() {
        let docs: Vec<(String, String, Vec<f32>)> = (0..7)
            .map(|i| (format!("d{i}"), format!("same idea {i}"), vec![0.5, 0.5, 0.5]))
            .collect();
        let c = Corpus::new(
            docs.iter().map(|d| d.0.clone()).collect(),
            docs.iter().map(|d| d.1.clone()).collect(),
            docs.iter().map(|d| d.2.clone()).collect(),
        )
        .unwrap();
        let outline = OutlineBuilder::default().build(&c).unwrap();

        assert_eq!(outline.stats.strategy, originality::Strategy::Local);
        assert!(outline.originality.iter().all(|s| (s - 1.0).abs() < 1e-6));
        let mut stack: Vec<&TreeNode> = outline.nodes.iter().collect();
        while let Some(node) = stack.pop() {
            assert!((node.originality() - 1.0).abs() < 1e-6, "{node}");
            stack.extend(node.children());
        }
    }

    #[test]
    fn test_close_pair_and_far_one() {
        let c = corpus(&[
            ("fans", "GPU cooling fan noise", vec![1.0, 0.0, 0.0]),
            ("quiet", "Fan noise reduction for GPUs", vec![0.99, 0.05, 0.0]),
            ("bread", "Sourdough starter feeding schedule", vec![0.0, 0.0, 1.0]),
        ]);
        let outline = OutlineBuilder::new(BuildConfig::default().with_max_depth(2))
            .build(&c)
            .unwrap();

        let tops = headings(&outline.nodes);
        assert_eq!(tops.len(), 2);
        assert_eq!(outline.nodes.len(), 2);

        let mut sizes: Vec<usize> = tops.iter().map(|h| h.children().len()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 2]);

        for h in &tops {
            assert_eq!(h.level(), Some(1));
            assert_ne!(h.title(), UNTITLED);
            assert!(!h.title().is_empty());
            assert!(h.children().iter().all(TreeNode::is_leaf));
        }
        // Label order follows first appearance: the pair comes first.
        assert_eq!(tops[0].leaf_ids(), vec!["fans", "quiet"]);
        assert_eq!(tops[1].leaf_ids(), vec!["bread"]);
        assert!(tops.iter().all(|h| (0.0..=1.0).contains(&h.originality())));
    }

    #[test]
    fn test_custom_titler() {
        let c = corpus(&[
            ("a", "x", vec![1.0, 0.0]),
            ("b", "y", vec![0.9, 0.1]),
            ("c", "z", vec![0.0, 1.0]),
        ]);
        let outline = OutlineBuilder::default()
            .with_titler(from_fn(|texts: &[&str]| texts.join("+")))
            .build(&c)
            .unwrap();
        let titles: Vec<&str> = outline.nodes.iter().map(TreeNode::title).collect();
        assert_eq!(titles, vec!["x+y", "z"]);
    }

    #[test]
    fn test_max_items_truncates() {
        let docs: Vec<(String, String, Vec<f32>)> = (0..6)
            .map(|i| (format!("d{i}"), format!("doc {i}"), vec![1.0, i as f32]))
            .collect();
        let c = Corpus::new(
            docs.iter().map(|d| d.0.clone()).collect(),
            docs.iter().map(|d| d.1.clone()).collect(),
            docs.iter().map(|d| d.2.clone()).collect(),
        )
        .unwrap();
        let outline = OutlineBuilder::new(BuildConfig::default().with_max_items(4))
            .build(&c)
            .unwrap();
        assert_eq!(outline.stats.n_documents, 4);
        assert_eq!(outline.stats.n_truncated, 2);
        let ids: BTreeSet<&str> = outline.leaf_ids().into_iter().collect();
        assert_eq!(ids, ["d0", "d1", "d2", "d3"].into_iter().collect());
    }

    #[test]
    fn test_contrast_titles_and_local_strategy() {
        let c = corpus(&[
            ("fans", "GPU cooling fan noise", vec![1.0, 0.0, 0.0]),
            ("quiet", "Fan noise reduction for GPUs", vec![0.99, 0.05, 0.0]),
            ("bread", "Sourdough starter feeding schedule", vec![0.0, 0.0, 1.0]),
        ]);
        let config = BuildConfig::default()
            .with_titles(TitleStrategy::CorpusContrast)
            .with_originality(
                OriginalityConfig::default().with_strategy(originality::Strategy::Local),
            );
        let outline = OutlineBuilder::new(config).build(&c).unwrap();
        assert_eq!(outline.stats.strategy, originality::Strategy::Local);
        assert!(outline.projection.is_none());
        assert!(outline.nodes.iter().all(|n| n.title() != UNTITLED));
    }

    fn arb_corpus() -> impl Strategy<Value = Corpus> {
        proptest::collection::vec(proptest::collection::vec(-1.0f32..1.0, 4), 0..28).prop_map(
            |vectors| {
                let words = ["fan", "noise", "bread", "yeast", "rust", "tree", "graph", "cache"];
                let ids = (0..vectors.len()).map(|i| format!("doc-{i}")).collect();
                let texts = (0..vectors.len())
                    .map(|i| format!("{} {} idea", words[i % 8], words[(i * 3 + 1) % 8]))
                    .collect();
                Corpus::new(ids, texts, vectors).unwrap()
            },
        )
    }

    fn check_levels(nodes: &[TreeNode], level: usize, max_depth: usize) -> bool {
        nodes.iter().all(|n| match n {
            TreeNode::Leaf { originality, .. } => (0.0..=1.0).contains(originality),
            TreeNode::Heading {
                level: l,
                children,
                originality,
                ..
            } => {
                *l == level
                    && *l <= max_depth
                    && !children.is_empty()
                    && (0.0..=1.0).contains(originality)
                    && check_levels(children, level + 1, max_depth)
            }
        })
    }

    proptest! {
        #[test]
        fn outline_covers_every_document_once(c in arb_corpus(), max_depth in 1usize..4) {
            let outline = OutlineBuilder::new(BuildConfig::default().with_max_depth(max_depth))
                .build(&c)
                .unwrap();
            let mut got: Vec<&str> = outline.leaf_ids();
            got.sort_unstable();
            let mut want: Vec<&str> = c.ids().iter().map(String::as_str).collect();
            want.sort_unstable();
            prop_assert_eq!(got, want);
            prop_assert!(check_levels(&outline.nodes, 1, max_depth));
            prop_assert!(outline.stats.depth <= max_depth);
        }

        #[test]
        fn build_is_deterministic(c in arb_corpus()) {
            let builder = OutlineBuilder::default();
            let a = builder.build(&c).unwrap();
            let b = builder.build(&c).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
