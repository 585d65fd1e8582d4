//! Merge history of agglomerative clustering.
//!
//! A dendrogram represents the nested structure of clusters produced
//! by agglomerative (bottom-up) clustering. Cluster ids follow the
//! SciPy/MATLAB convention: leaves are `0..n`, merge `i` creates `n + i`.

/// A dendrogram representing hierarchical cluster merges.
///
/// Each merge combines two clusters into one, recording:
/// - Which clusters were merged
/// - The distance at which they merged
/// - The size of the resulting cluster
#[derive(Debug, Clone)]
pub struct Dendrogram {
    merges: Vec<Merge>,
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// First cluster being merged (index).
    pub cluster_a: usize,
    /// Second cluster being merged (index).
    pub cluster_b: usize,
    /// Distance/dissimilarity at which merge occurred.
    pub distance: f64,
    /// Size of resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create a new dendrogram for n items.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge operation.
    pub fn add_merge(&mut self, cluster_a: usize, cluster_b: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            distance,
            size,
        });
    }

    /// Cluster assignments after stopping the agglomeration at `k` clusters.
    ///
    /// Replays the first `n - k` merges, so the result has exactly
    /// `min(k, n)` clusters as long as enough merges were recorded (fewer
    /// merges leave more clusters). `k == 0` is treated as `1`.
    ///
    /// Labels are numbered by first appearance in item order: the cluster
    /// holding item 0 is label 0, the next new cluster is label 1, and so on.
    pub fn cut_to_k(&self, k: usize) -> Vec<usize> {
        let n = self.n_items;
        if n == 0 {
            return Vec::new();
        }
        let k = k.clamp(1, n);
        let n_merges = (n - k).min(self.merges.len());

        // Union-find over leaves and merge-created ids.
        let mut parent: Vec<usize> = (0..n + n_merges).collect();
        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        for (i, merge) in self.merges.iter().take(n_merges).enumerate() {
            let new_id = n + i;
            let (a, b) = (merge.cluster_a, merge.cluster_b);
            if a >= new_id || b >= new_id {
                // Malformed step: refers to a cluster that does not exist yet.
                continue;
            }
            let ra = find(&mut parent, a);
            let rb = find(&mut parent, b);
            parent[ra] = new_id;
            parent[rb] = new_id;
        }

        let mut labels = Vec::with_capacity(n);
        let mut seen: Vec<(usize, usize)> = Vec::new();
        for item in 0..n {
            let root = find(&mut parent, item);
            let label = match seen.iter().find(|(r, _)| *r == root) {
                Some(&(_, l)) => l,
                None => {
                    let l = seen.len();
                    seen.push((root, l));
                    l
                }
            };
            labels.push(label);
        }
        labels
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }
}
