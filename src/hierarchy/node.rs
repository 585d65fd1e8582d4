//! Outline tree node.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A node in an outline.
///
/// Serialized with a `type` tag, which is also the cache file format:
///
/// ```text
/// {"type":"heading","title":"Fan & Noise","level":1,"originality":0.4,"children":[...]}
/// {"type":"leaf","id":"gpu-fans","title":"gpu-fans","text":"...","originality":0.7}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// A single document.
    Leaf {
        /// Document id.
        id: String,
        /// Display title (the id).
        title: String,
        /// Stored document text.
        text: String,
        /// Novelty in `[0, 1]`.
        originality: f32,
    },
    /// A group of related documents.
    Heading {
        /// Synthetic title.
        title: String,
        /// Nesting level, 1 at the top.
        level: usize,
        /// Non-empty child sequence.
        children: Vec<TreeNode>,
        /// Novelty in `[0, 1]`.
        originality: f32,
    },
}

impl TreeNode {
    /// Create a leaf titled by its id.
    pub fn leaf(id: impl Into<String>, text: impl Into<String>, originality: f32) -> Self {
        let id = id.into();
        Self::Leaf {
            title: id.clone(),
            id,
            text: text.into(),
            originality,
        }
    }

    /// Create a heading.
    pub fn heading(
        title: impl Into<String>,
        level: usize,
        children: Vec<TreeNode>,
        originality: f32,
    ) -> Self {
        Self::Heading {
            title: title.into(),
            level,
            children,
            originality,
        }
    }

    /// Check if this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Display title.
    pub fn title(&self) -> &str {
        match self {
            Self::Leaf { title, .. } | Self::Heading { title, .. } => title,
        }
    }

    /// Originality score.
    pub fn originality(&self) -> f32 {
        match self {
            Self::Leaf { originality, .. } | Self::Heading { originality, .. } => *originality,
        }
    }

    /// Heading level, `None` for leaves.
    pub fn level(&self) -> Option<usize> {
        match self {
            Self::Heading { level, .. } => Some(*level),
            Self::Leaf { .. } => None,
        }
    }

    /// Children (empty for leaves).
    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::Heading { children, .. } => children,
            Self::Leaf { .. } => &[],
        }
    }

    /// Ids of every leaf under this node, depth-first.
    pub fn leaf_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_leaf_ids(std::slice::from_ref(self), &mut out);
        out
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Deepest heading level in this subtree (0 for a leaf).
    pub fn max_level(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Heading { level, children, .. } => children
                .iter()
                .map(TreeNode::max_level)
                .fold(*level, usize::max),
        }
    }
}

/// Ids of every leaf in a node sequence, depth-first.
pub fn leaf_ids(nodes: &[TreeNode]) -> Vec<&str> {
    let mut out = Vec::new();
    collect_leaf_ids(nodes, &mut out);
    out
}

fn collect_leaf_ids<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            TreeNode::Leaf { id, .. } => out.push(id),
            TreeNode::Heading { children, .. } => collect_leaf_ids(children, out),
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf { id, originality, .. } => write!(f, "Leaf[{id}] ({originality:.2})"),
            Self::Heading {
                title,
                level,
                children,
                originality,
            } => write!(
                f,
                "Heading L{level}: {title} ({} children, {originality:.2})",
                children.len()
            ),
        }
    }
}
