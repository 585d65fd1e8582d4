//! Synthetic titles for groups of documents.
//!
//! A title is one to three short terms pulled from the member texts and
//! joined with `" & "`, e.g. `"Fan & Noise & Gpus"`. Strategies differ
//! only in how they rank candidate terms:
//!
//! | Strategy | Term statistic |
//! |----------|----------------|
//! | [`ClusterTfIdf`] | TF-IDF fitted on the cluster's own texts |
//! | [`CorpusContrast`] | cluster term frequency × corpus-wide IDF |
//! | [`FnTitler`] | anything, via [`from_fn`] |
//!
//! The statistical strategies share the selection policy in
//! [`compose_title`]: rank, reject candidates sharing a word root with an
//! already chosen term, keep at most `max_terms`, title-case.
//!
//! Synthesis never fails. An empty group gets [`UNTITLED`]; a group with no
//! usable terms gets a truncated prefix of its first text.

mod terms;
mod tfidf;

pub use terms::{candidates, normalize, shares_root, title_case};
pub use tfidf::{ClusterTfIdf, CorpusContrast};

use std::cmp::Ordering;
use tracing::debug;

/// Title of an empty group.
pub const UNTITLED: &str = "Untitled Section";

/// Characters of the first text kept by the fallback title.
pub const FALLBACK_CHARS: usize = 50;

/// Separator between the terms of a title.
pub const TERM_SEPARATOR: &str = " & ";

/// Largest number of terms in a title.
pub const MAX_TITLE_TERMS: usize = 3;

/// Derives a short human-readable label for a set of texts.
pub trait TitleSynthesizer {
    /// Title for the given member texts.
    fn synthesize(&self, texts: &[&str]) -> String;
}

impl<T: TitleSynthesizer + ?Sized> TitleSynthesizer for &T {
    fn synthesize(&self, texts: &[&str]) -> String {
        (**self).synthesize(texts)
    }
}

impl<T: TitleSynthesizer + ?Sized> TitleSynthesizer for Box<T> {
    fn synthesize(&self, texts: &[&str]) -> String {
        (**self).synthesize(texts)
    }
}

/// A closure-based title synthesizer.
#[derive(Clone)]
pub struct FnTitler<F> {
    f: F,
}

impl<F> FnTitler<F> {
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> std::fmt::Debug for FnTitler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnTitler")
    }
}

impl<F> TitleSynthesizer for FnTitler<F>
where
    F: Fn(&[&str]) -> String,
{
    fn synthesize(&self, texts: &[&str]) -> String {
        (self.f)(texts)
    }
}

/// Create a title synthesizer from a closure.
pub fn from_fn<F>(f: F) -> FnTitler<F>
where
    F: Fn(&[&str]) -> String,
{
    FnTitler::new(f)
}

/// Title built from the first text when no term could be extracted.
///
/// First [`FALLBACK_CHARS`] characters followed by `"..."`; [`UNTITLED`]
/// when there is no non-blank text.
pub fn fallback_title(texts: &[&str]) -> String {
    match texts.first().map(|t| t.trim()) {
        Some(first) if !first.is_empty() => {
            let prefix: String = first.chars().take(FALLBACK_CHARS).collect();
            format!("{prefix}...")
        }
        _ => UNTITLED.to_string(),
    }
}

/// Select and format a title from scored candidate terms.
///
/// Candidates are ranked by score (descending, ties lexicographic), then
/// taken greedily while skipping any term that shares a word root with one
/// already chosen. Returns `None` when nothing was selected.
pub fn compose_title(mut scored: Vec<(String, f64)>, max_terms: usize) -> Option<String> {
    let max_terms = max_terms.clamp(1, MAX_TITLE_TERMS);
    scored.retain(|(_, s)| s.is_finite() && *s > 0.0);
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut chosen: Vec<String> = Vec::with_capacity(max_terms);
    for (term, _) in scored {
        if chosen.len() == max_terms {
            break;
        }
        if chosen.iter().any(|c| shares_root(c, &term)) {
            continue;
        }
        chosen.push(term);
    }

    if chosen.is_empty() {
        return None;
    }
    Some(
        chosen
            .iter()
            .map(|t| title_case(t))
            .collect::<Vec<_>>()
            .join(TERM_SEPARATOR),
    )
}

/// Apply the shared failure policy around a ranking.
pub(crate) fn finish(texts: &[&str], scored: Vec<(String, f64)>, max_terms: usize) -> String {
    if texts.is_empty() {
        return UNTITLED.to_string();
    }
    match compose_title(scored, max_terms) {
        Some(title) => title,
        None => {
            debug!(n_texts = texts.len(), "no title terms extracted, using text prefix");
            fallback_title(texts)
        }
    }
}
