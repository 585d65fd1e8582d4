//! Clustering used to group documents at each level of the outline.
//!
//! ## Hierarchical (Agglomerative) Clustering
//!
//! Bottom-up: start with each document as its own cluster, repeatedly merge
//! the two closest clusters. The merge history forms a **dendrogram**, a
//! binary tree that can be cut to any number of clusters.
//!
//! Documents are compared by cosine distance and clusters by average
//! linkage (mean pairwise distance), which is robust to the uneven cluster
//! sizes typical of a personal note collection.
//!
//! ## Usage
//!
//! ```rust
//! use ideatree::cluster::{Clustering, HierarchicalClustering};
//!
//! let data: Vec<Vec<f32>> = vec![
//!     vec![1.0, 0.0],
//!     vec![0.9, 0.1],
//!     vec![0.0, 1.0],
//!     vec![0.1, 0.9],
//! ];
//! let refs: Vec<&[f32]> = data.iter().map(|v| v.as_slice()).collect();
//!
//! let labels = HierarchicalClustering::new(2).fit_predict(&refs).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

mod dendrogram;
mod hierarchical;
mod traits;

pub use dendrogram::{Dendrogram, Merge};
pub use hierarchical::{HierarchicalClustering, Linkage};
pub use traits::Clustering;

/// Branching factor for a level with `n_items` documents.
///
/// `max(2, round(sqrt(n)))`, never more than `n_items`.
pub fn branching_factor(n_items: usize) -> usize {
    let k = (n_items as f64).sqrt().round() as usize;
    k.max(2).min(n_items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branching_factor_follows_square_root() {
        assert_eq!(branching_factor(3), 2);
        assert_eq!(branching_factor(7), 3);
        assert_eq!(branching_factor(100), 10);
        assert_eq!(branching_factor(1), 1);
    }
}
