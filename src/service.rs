//! View/rebuild orchestration over store, builder and cache.
//!
//! ```text
//! view()            cache.load()                        (no pipeline run)
//! rebuild()         store.get_all → builder.build → cache.save
//! view_or_rebuild() view(), else rebuild()
//! ```
//!
//! A rebuild that fails before the save leaves the previous cached tree in
//! place.

use tracing::{info, warn};

use crate::cache::StructureCache;
use crate::codec;
use crate::error::Result;
use crate::hierarchy::{BuildConfig, Outline, OutlineBuilder, TreeNode};
use crate::store::EmbeddingStore;

/// Outline access for a presentation layer.
#[derive(Debug)]
pub struct OutlineService<S, C> {
    store: S,
    cache: C,
    builder: OutlineBuilder,
}

impl<S: EmbeddingStore, C: StructureCache> OutlineService<S, C> {
    /// Create a service with the default builder.
    pub fn new(store: S, cache: C) -> Self {
        Self::with_builder(store, cache, OutlineBuilder::default())
    }

    /// Create a service with a configured builder.
    pub fn with_builder(store: S, cache: C, builder: OutlineBuilder) -> Self {
        Self {
            store,
            cache,
            builder,
        }
    }

    /// Create a service configured from `IDEATREE_*` variables.
    pub fn from_env(store: S, cache: C) -> Self {
        Self::with_builder(store, cache, OutlineBuilder::new(BuildConfig::from_env()))
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Underlying cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// The cached outline, if any.
    pub fn view(&self) -> Option<Vec<TreeNode>> {
        self.cache.load()
    }

    /// Rebuild from the store and replace the cached outline.
    pub fn rebuild(&self) -> Result<Outline> {
        let max_items = self.builder.config().max_items;
        let corpus = match self.store.get_all(max_items) {
            Ok(corpus) => corpus,
            Err(err) => {
                warn!(error = %err, "corpus fetch failed, keeping cached outline");
                return Err(err);
            }
        };
        let outline = self.builder.build(&corpus)?;
        self.cache.save(&outline.nodes)?;
        info!(
            n_docs = outline.stats.n_documents,
            n_headings = outline.stats.n_headings,
            "outline rebuilt"
        );
        Ok(outline)
    }

    /// The cached outline, rebuilding on a miss.
    pub fn view_or_rebuild(&self) -> Result<Vec<TreeNode>> {
        match self.view() {
            Some(tree) => Ok(tree),
            None => Ok(self.rebuild()?.into_nodes()),
        }
    }

    /// Documents similar to `(name, description)`, as decoded
    /// `(name, description)` pairs, most similar first.
    pub fn similar(&self, name: &str, description: &str, k: usize) -> Result<Vec<(String, String)>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let query = codec::encode(name, description);
        let hits = self.store.query_similar(&query, k)?;
        Ok(hits
            .into_iter()
            .map(|(id, text)| {
                let description = codec::decode(&id, &text);
                (id, description)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::error::Error;
    use crate::hierarchy::leaf_ids;
    use crate::store::{Corpus, MemoryStore};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn seeded() -> MemoryStore {
        let store = MemoryStore::default();
        for (name, desc) in [
            ("gpu-fans", "GPU cooling fan noise"),
            ("quiet-gpu", "Fan noise reduction for GPUs"),
            ("starter", "Sourdough starter feeding schedule"),
            ("crumb", "Open crumb sourdough bread"),
            ("borrow", "Rust borrow checker lifetimes"),
        ] {
            store.insert(name, &codec::encode(name, desc)).unwrap();
        }
        store
    }

    /// Store that can be switched off.
    struct FlakyStore {
        inner: MemoryStore,
        down: AtomicBool,
    }

    impl EmbeddingStore for FlakyStore {
        fn insert(&self, id: &str, text: &str) -> Result<()> {
            self.inner.insert(id, text)
        }
        fn update(&self, id: &str, text: &str) -> Result<()> {
            self.inner.update(id, text)
        }
        fn remove(&self, id: &str) -> Result<()> {
            self.inner.remove(id)
        }
        fn query_similar(&self, text: &str, k: usize) -> Result<Vec<(String, String)>> {
            self.inner.query_similar(text, k)
        }
        fn get_all(&self, limit: usize) -> Result<Corpus> {
            if self.down.load(Ordering::SeqCst) {
                return Err(Error::Store("connection refused".into()));
            }
            self.inner.get_all(limit)
        }
    }

    #[test]
    fn view_is_empty_until_rebuild() {
        let service = OutlineService::new(seeded(), MemoryCache::new());
        assert!(service.view().is_none());

        let outline = service.rebuild().unwrap();
        assert_eq!(outline.stats.n_documents, 5);
        let cached = service.view().unwrap();
        assert_eq!(cached, outline.nodes);
    }

    #[test]
    fn view_or_rebuild_builds_once() {
        let service = OutlineService::new(seeded(), MemoryCache::new());
        let first = service.view_or_rebuild().unwrap();
        service.store().remove("borrow").unwrap();
        // Served from cache: the removal is not visible until a rebuild.
        let second = service.view_or_rebuild().unwrap();
        assert_eq!(first, second);
        assert_eq!(leaf_ids(&second).len(), 5);
    }

    #[test]
    fn failed_rebuild_keeps_cache() {
        let store = FlakyStore {
            inner: seeded(),
            down: AtomicBool::new(false),
        };
        let service = OutlineService::new(store, MemoryCache::new());
        let before = service.rebuild().unwrap().into_nodes();

        service.store().insert("new", "brand new idea").unwrap();
        service.store().down.store(true, Ordering::SeqCst);
        let err = service.rebuild().unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert_eq!(service.view().unwrap(), before);
    }

    #[test]
    fn similar_decodes_descriptions() {
        let service = OutlineService::new(seeded(), MemoryCache::new());
        let hits = service.similar("fan-idea", "fan noise", 2).unwrap();
        assert_eq!(hits.len(), 2);
        for (name, description) in &hits {
            assert!(!description.starts_with(&codec::prefix(name)));
        }
        assert!(service.similar("x", "y", 0).unwrap().is_empty());
    }

    #[test]
    fn similar_finds_related_documents() {
        let service = OutlineService::new(seeded(), MemoryCache::new());
        let hits = service.similar("bread", "sourdough bread starter", 2).unwrap();
        let names: Vec<&str> = hits.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"starter") || names.contains(&"crumb"), "{names:?}");
    }
}
