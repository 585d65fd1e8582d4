//! # ideatree
//!
//! Self-organizing outlines for a collection of short ideas.
//!
//! Documents (a name plus a free-text description) live in an embedding
//! store. On request the whole collection is grouped by embedding
//! similarity into a shallow tree, each group is titled from its own
//! vocabulary, and every node gets an originality score in `[0, 1]`. The
//! tree is cached so later views skip the pipeline.
//!
//! ```text
//! EmbeddingStore ──get_all──▶ Corpus ──OutlineBuilder──▶ Outline ──▶ StructureCache
//!                                        │  cluster (average linkage)
//!                                        │  summarize (title per group)
//!                                        └  originality (corpus / local)
//! ```
//!
//! # Example
//!
//! ```
//! use ideatree::{codec, EmbeddingStore, MemoryCache, MemoryStore, OutlineService};
//!
//! let store = MemoryStore::default();
//! for (name, desc) in [
//!     ("fans", "GPU fan noise"),
//!     ("curve", "GPU fan curve tuning"),
//!     ("bread", "Sourdough bread"),
//! ] {
//!     store.insert(name, &codec::encode(name, desc)).unwrap();
//! }
//!
//! let service = OutlineService::new(store, MemoryCache::new());
//! let outline = service.rebuild().unwrap();
//! assert_eq!(outline.leaf_ids().len(), 3);
//! assert!(service.view().is_some());
//! ```

pub mod cache;
pub mod cluster;
pub mod codec;
pub mod distance;
/// Error types used across `ideatree`.
pub mod error;
pub mod hierarchy;
#[cfg(feature = "network")]
pub mod network;
pub mod originality;
pub mod service;
pub mod store;
pub mod summarize;

pub use cache::{JsonFileCache, MemoryCache, StructureCache};
pub use error::{Error, Result};
pub use hierarchy::{
    render_markdown, BuildConfig, BuildStats, HealthCheck, Outline, OutlineBuilder, TitleStrategy,
    TreeNode,
};
pub use originality::{OriginalityConfig, OriginalityScorer};
pub use service::OutlineService;
pub use store::{Corpus, EmbeddingStore, HashEmbedder, MemoryStore};
pub use summarize::TitleSynthesizer;

#[cfg(feature = "network")]
pub use network::similarity_network;

#[cfg(feature = "writer")]
pub use store::IndexWriter;
