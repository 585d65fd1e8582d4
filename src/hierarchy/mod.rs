//! Outline construction: from a bag of embedded documents to a titled tree.
//!
//! # The Core Idea
//!
//! Nobody authors the structure. Documents that sit close together in
//! embedding space are grouped, each group is named from its own words, and
//! the grouping recurses until groups are tiny or the depth bound is hit:
//!
//! ```text
//! Level 1:   [Fan & Noise & Gpus]            [Sourdough & Starter]
//!             /          |        \               /        \
//! Level 2: [Curves]  [Coolers]   leaf          leaf        leaf
//!           /   \       |
//!         leaf  leaf   leaf
//! ```
//!
//! Every node carries an originality score in `[0, 1]` (see
//! [`crate::originality`]).
//!
//! # Module Overview
//!
//! | Item | Role |
//! |------|------|
//! | [`TreeNode`] | tagged `heading` / `leaf` node, the cache format |
//! | [`OutlineBuilder`] | recursive clustering + titles + scores |
//! | [`BuildConfig`] | depth, size cap, title and originality settings |
//! | [`validate_outline`], [`HealthCheck`] | structural guarantees |
//! | [`render_markdown`] | contents + body as Markdown |
//!
//! # Guarantees
//!
//! - Every input document appears as exactly one leaf.
//! - Headings are non-empty, start at level 1 and step by 1.
//! - No heading is deeper than `max_depth`.
//! - The outline is a deterministic function of corpus and configuration.

mod builder;
mod config;
mod node;
mod render;
mod validate;

pub use builder::{BuildStats, Outline, OutlineBuilder};
pub use config::{BuildConfig, TitleStrategy};
pub use node::{leaf_ids, TreeNode};
pub use render::render_markdown;
pub use validate::{
    validate_outline, HealthCheck, HealthReport, Severity, ValidationIssue, ValidationReport,
};
