use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Characters deleted from text before it is split into terms.
pub const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// English stop words dropped by a default-configured index.
pub const DEFAULT_STOP_WORDS: [&str; 26] = [
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "into",
    "is", "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with",
];

lazy_static! {
    static ref PUNCT_RE: Regex =
        Regex::new(&format!("[{}]", regex::escape(PUNCTUATION))).expect("valid regex");
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// Split text into terms: punctuation is deleted, whitespace runs collapse
/// to one separator, and empty pieces are dropped. Case is preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    let stripped = PUNCT_RE.replace_all(text, "");
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    collapsed
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Case-fold a single term. Applied at both build and query time.
pub fn normalize_term(term: &str) -> String {
    term.to_lowercase()
}

/// Tokenize and case-fold, then drop stop words. This is the term stream
/// the index builder sees for each document.
pub fn analyze(text: &str, stop_words: &StopWords) -> Vec<String> {
    tokenize(text)
        .iter()
        .map(|t| normalize_term(t))
        .filter(|t| !stop_words.contains(t))
        .collect()
}

/// An immutable set of terms excluded from indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Build a custom list. Entries are lowercased; blank entries are ignored.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalize_term(w.as_ref().trim()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// A list that filters nothing.
    pub fn none() -> Self {
        Self { words: HashSet::new() }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS)
    }
}
