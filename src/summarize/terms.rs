//! Term extraction shared by the statistical title strategies.
//!
//! ```text
//! "Fan noise reduction for GPUs!"
//!   normalize  → "fan noise reduction for gpus "
//!   tokens     → [fan, noise, reduction, for, gpus]
//!   candidates → fan, noise, reduction, gpus, "fan noise", "noise reduction"
//! ```
//!
//! Bigrams only join adjacent content tokens, so "reduction for gpus" never
//! yields a bigram across the stopword.

/// English stopwords dropped before candidate extraction.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "else",
    "etc", "even", "ever", "every", "few", "for", "from", "further", "get", "got", "had", "has",
    "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
    "however", "if", "in", "into", "is", "it", "its", "itself", "just", "least", "less", "let",
    "like", "made", "make", "many", "may", "me", "might", "more", "most", "much", "must", "my",
    "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "one", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "per", "same", "shall", "she", "should",
    "since", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "though", "through", "thus",
    "to", "too", "under", "until", "up", "upon", "us", "use", "used", "using", "very", "via",
    "was", "we", "well", "were", "what", "when", "where", "whether", "which", "while", "who",
    "whom", "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Whether `word` (already lower-cased) is a stopword.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

/// Lower-case and replace every non-alphanumeric character with a space.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

/// Normalized whitespace-separated tokens, stopwords included.
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn is_content(token: &str) -> bool {
    token.chars().count() >= 2
        && !token.chars().all(|c| c.is_ascii_digit())
        && !is_stopword(token)
}

/// Candidate terms of one text, with repetition, in reading order.
pub fn candidates(text: &str) -> Vec<String> {
    let toks = tokens(text);
    let content: Vec<bool> = toks.iter().map(|t| is_content(t)).collect();

    let mut out = Vec::new();
    for (i, tok) in toks.iter().enumerate() {
        if !content[i] {
            continue;
        }
        out.push(tok.clone());
        if i + 1 < toks.len() && content[i + 1] && toks[i + 1] != *tok {
            out.push(format!("{} {}", tok, toks[i + 1]));
        }
    }
    out
}

/// Crude root of a word: a plural `s` is dropped.
///
/// Enough to keep "gpu" and "gpus" from both landing in one title.
pub fn root(word: &str) -> &str {
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        &word[..word.len() - 1]
    } else {
        word
    }
}

/// Whether two terms have any word root in common.
pub fn shares_root(a: &str, b: &str) -> bool {
    a.split(' ')
        .any(|wa| b.split(' ').any(|wb| root(wa) == root(wb)))
}

/// Upper-case the first letter of every word.
pub fn title_case(term: &str) -> String {
    term.split(' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
