//! Outline build configuration.
//!
//! Defaults come from [`BuildConfig::default`]; [`BuildConfig::from_env`]
//! overlays any of these variables that parse:
//!
//! | Variable | Field | Values |
//! |----------|-------|--------|
//! | `IDEATREE_MAX_DEPTH` | `max_depth` | integer ≥ 1 |
//! | `IDEATREE_MAX_ITEMS` | `max_items` | integer ≥ 1 |
//! | `IDEATREE_TITLE_TERMS` | `title_terms` | 1..=3 |
//! | `IDEATREE_TITLES` | `titles` | `tfidf` \| `contrast` |
//! | `IDEATREE_ORIGINALITY` | `originality.strategy` | `corpus` \| `local` |
//! | `IDEATREE_AGGREGATION` | `originality.aggregation` | `centroid` \| `mean` |
//! | `IDEATREE_NEIGHBORS` | `originality.n_neighbors` | integer ≥ 1 |
//! | `IDEATREE_COMPONENTS` | `originality.n_components` | integer ≥ 1 |
//!
//! Unparseable values are ignored with a warning.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::originality::{Aggregation, OriginalityConfig, Strategy};
use crate::summarize::MAX_TITLE_TERMS;

/// Which statistical title strategy the builder uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStrategy {
    /// TF-IDF over the cluster's own texts.
    #[default]
    ClusterTfIdf,
    /// Cluster frequency against corpus-wide document frequency.
    CorpusContrast,
}

/// Configuration for building an outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Deepest heading level.
    pub max_depth: usize,
    /// Documents considered per build; the rest are dropped.
    pub max_items: usize,
    /// Terms per heading title.
    pub title_terms: usize,
    /// Title strategy.
    pub titles: TitleStrategy,
    /// Originality scoring.
    pub originality: OriginalityConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_items: 500,
            title_terms: MAX_TITLE_TERMS,
            titles: TitleStrategy::ClusterTfIdf,
            originality: OriginalityConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Create a new build configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the corpus size cap.
    pub fn with_max_items(mut self, n: usize) -> Self {
        self.max_items = n;
        self
    }

    /// Set terms per title (clamped to 1..=3).
    pub fn with_title_terms(mut self, n: usize) -> Self {
        self.title_terms = n.clamp(1, MAX_TITLE_TERMS);
        self
    }

    /// Set the title strategy.
    pub fn with_titles(mut self, titles: TitleStrategy) -> Self {
        self.titles = titles;
        self
    }

    /// Set originality scoring.
    pub fn with_originality(mut self, originality: OriginalityConfig) -> Self {
        self.originality = originality;
        self
    }

    /// Defaults overlaid with `IDEATREE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_ascii_lowercase())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = read_usize(&read, "IDEATREE_MAX_DEPTH", 1) {
            config.max_depth = v;
        }
        if let Some(v) = read_usize(&read, "IDEATREE_MAX_ITEMS", 1) {
            config.max_items = v;
        }
        if let Some(v) = read_usize(&read, "IDEATREE_TITLE_TERMS", 1) {
            config.title_terms = v.min(MAX_TITLE_TERMS);
        }
        if let Some(v) = read_usize(&read, "IDEATREE_NEIGHBORS", 1) {
            config.originality.n_neighbors = v;
        }
        if let Some(v) = read_usize(&read, "IDEATREE_COMPONENTS", 1) {
            config.originality.n_components = v;
        }
        match read("IDEATREE_TITLES").as_deref() {
            None => {}
            Some("tfidf") => config.titles = TitleStrategy::ClusterTfIdf,
            Some("contrast") => config.titles = TitleStrategy::CorpusContrast,
            Some(other) => warn!(value = other, "ignoring IDEATREE_TITLES"),
        }
        match read("IDEATREE_ORIGINALITY").as_deref() {
            None => {}
            Some("corpus") => config.originality.strategy = Strategy::Corpus,
            Some("local") => config.originality.strategy = Strategy::Local,
            Some(other) => warn!(value = other, "ignoring IDEATREE_ORIGINALITY"),
        }
        match read("IDEATREE_AGGREGATION").as_deref() {
            None => {}
            Some("centroid") => config.originality.aggregation = Aggregation::CentroidNovelty,
            Some("mean") => config.originality.aggregation = Aggregation::MeanOfMembers,
            Some(other) => warn!(value = other, "ignoring IDEATREE_AGGREGATION"),
        }
        config
    }
}

fn read_usize<R>(read: &R, name: &str, min_value: usize) -> Option<usize>
where
    R: Fn(&str) -> Option<String>,
{
    let raw = read(name)?;
    match raw.parse::<usize>() {
        Ok(v) if v >= min_value => Some(v),
        _ => {
            warn!(name, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_build_config_default() {
        let config = BuildConfig::default();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_items, 500);
        assert_eq!(config.title_terms, 3);
        assert_eq!(config.originality.n_neighbors, 15);
        assert_eq!(config.originality.n_components, 5);
    }

    #[test]
    fn test_builder_setters() {
        let config = BuildConfig::new()
            .with_max_depth(2)
            .with_max_items(10)
            .with_title_terms(9)
            .with_titles(TitleStrategy::CorpusContrast);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_items, 10);
        assert_eq!(config.title_terms, 3);
        assert_eq!(config.titles, TitleStrategy::CorpusContrast);
    }

    #[test]
    fn lookup_overlays_values() {
        let config = BuildConfig::from_lookup(lookup(&[
            ("IDEATREE_MAX_DEPTH", "2"),
            ("IDEATREE_MAX_ITEMS", " 40 "),
            ("IDEATREE_TITLE_TERMS", "7"),
            ("IDEATREE_TITLES", "contrast"),
            ("IDEATREE_ORIGINALITY", "Local"),
            ("IDEATREE_AGGREGATION", "mean"),
            ("IDEATREE_NEIGHBORS", "8"),
            ("IDEATREE_COMPONENTS", "3"),
        ]));
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_items, 40);
        assert_eq!(config.title_terms, 3);
        assert_eq!(config.titles, TitleStrategy::CorpusContrast);
        assert_eq!(config.originality.strategy, Strategy::Local);
        assert_eq!(config.originality.aggregation, Aggregation::MeanOfMembers);
        assert_eq!(config.originality.n_neighbors, 8);
        assert_eq!(config.originality.n_components, 3);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = BuildConfig::from_lookup(lookup(&[
            ("IDEATREE_MAX_DEPTH", "0"),
            ("IDEATREE_MAX_ITEMS", "lots"),
            ("IDEATREE_ORIGINALITY", "psychic"),
        ]));
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn serde_fills_missing_fields() {
        let config: BuildConfig = serde_json::from_str(r#"{"max_depth": 1}"#).unwrap();
        assert_eq!(config.max_depth, 1);
        assert_eq!(config.max_items, 500);
    }
}
