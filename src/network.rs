//! Nearest-neighbor exploration graph.
//!
//! Starting from one document, ask the store for its neighbors, then for
//! theirs, narrowing the fan-out with depth:
//!
//! ```text
//! depth d asks for 8 / (d + 1) neighbors:   d=0 → 8, d=1 → 4, d=2 → 2
//! ```
//!
//! Nodes are document ids; an edge joins a document to each neighbor the
//! store returned for it, weighted by cosine similarity of the stored
//! vectors (1.0 when the store does not expose vectors). The graph feeds a
//! presentation layer's network view; drawing it is not done here.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};
use tracing::debug;

use crate::distance::cosine_distance;
use crate::error::Result;
use crate::store::EmbeddingStore;

/// Neighbors requested at the start document.
const ROOT_FANOUT: usize = 8;

/// Neighbors requested at `depth`.
pub fn fanout_at(depth: usize) -> usize {
    ROOT_FANOUT / (depth + 1)
}

/// Explore the neighborhood of `start_id` down to `max_depth`.
///
/// `start_text` is the start document's stored text, used as the first
/// similarity query.
pub fn similarity_network<S>(
    store: &S,
    start_id: &str,
    start_text: &str,
    max_depth: usize,
) -> Result<UnGraph<String, f32>>
where
    S: EmbeddingStore + ?Sized,
{
    let mut explorer = Explorer {
        store,
        max_depth,
        graph: UnGraph::new_undirected(),
        index: HashMap::new(),
        visited: HashSet::new(),
        vectors: HashMap::new(),
    };
    let _ = explorer.node(start_id);
    explorer.visit(start_id, start_text, 0)?;
    debug!(
        start = start_id,
        n_nodes = explorer.graph.node_count(),
        n_edges = explorer.graph.edge_count(),
        "similarity network explored"
    );
    Ok(explorer.graph)
}

struct Explorer<'a, S: ?Sized> {
    store: &'a S,
    max_depth: usize,
    graph: UnGraph<String, f32>,
    index: HashMap<String, NodeIndex>,
    visited: HashSet<String>,
    vectors: HashMap<String, Option<Vec<f32>>>,
}

impl<S: EmbeddingStore + ?Sized> Explorer<'_, S> {
    fn visit(&mut self, id: &str, text: &str, depth: usize) -> Result<()> {
        if depth > self.max_depth || !self.visited.insert(id.to_string()) {
            return Ok(());
        }
        let k = fanout_at(depth);
        if k == 0 {
            return Ok(());
        }

        let neighbors = self.store.query_similar(text, k)?;
        for (neighbor, neighbor_text) in neighbors {
            if neighbor == id {
                continue;
            }
            let a = self.node(id);
            let b = self.node(&neighbor);
            if self.graph.find_edge(a, b).is_none() {
                let weight = self.similarity(id, &neighbor)?;
                let _ = self.graph.add_edge(a, b, weight);
            }
            self.visit(&neighbor, &neighbor_text, depth + 1)?;
        }
        Ok(())
    }

    fn node(&mut self, id: &str) -> NodeIndex {
        if let Some(&ix) = self.index.get(id) {
            return ix;
        }
        let ix = self.graph.add_node(id.to_string());
        let _ = self.index.insert(id.to_string(), ix);
        ix
    }

    fn vector(&mut self, id: &str) -> Result<Option<Vec<f32>>> {
        if let Some(v) = self.vectors.get(id) {
            return Ok(v.clone());
        }
        let v = self.store.vector(id)?;
        let _ = self.vectors.insert(id.to_string(), v.clone());
        Ok(v)
    }

    fn similarity(&mut self, a: &str, b: &str) -> Result<f32> {
        match (self.vector(a)?, self.vector(b)?) {
            (Some(va), Some(vb)) => Ok(1.0 - cosine_distance(&va, &vb)),
            _ => Ok(1.0),
        }
    }
}
