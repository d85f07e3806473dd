//! Boolean-OR query resolution.
//!
//! A query is either free text, which goes through the same tokenizer as
//! indexed content, or a list of pre-split terms, which are only
//! case-folded. Results are the union of the matching postings, ordered by
//! the query term that first produced each id and ascending within a term.

use crate::index::{DocId, InvertedIndex, Postings};
use crate::tokenizer::{normalize_term, tokenize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query<'a> {
    Text(&'a str),
    Terms(Vec<&'a str>),
}

impl<'a> Query<'a> {
    /// Case-folded lookup terms, in query order.
    pub fn terms(&self) -> Vec<String> {
        match self {
            Query::Text(text) => tokenize(text).iter().map(|t| normalize_term(t)).collect(),
            Query::Terms(terms) => terms.iter().map(|t| normalize_term(t)).collect(),
        }
    }
}

impl<'a> From<&'a str> for Query<'a> {
    fn from(text: &'a str) -> Self { Query::Text(text) }
}

impl<'a> From<&'a String> for Query<'a> {
    fn from(text: &'a String) -> Self { Query::Text(text.as_str()) }
}

impl<'a> From<Vec<&'a str>> for Query<'a> {
    fn from(terms: Vec<&'a str>) -> Self { Query::Terms(terms) }
}

impl<'a> From<&'a [&'a str]> for Query<'a> {
    fn from(terms: &'a [&'a str]) -> Self { Query::Terms(terms.to_vec()) }
}

impl<'a, const N: usize> From<[&'a str; N]> for Query<'a> {
    fn from(terms: [&'a str; N]) -> Self { Query::Terms(terms.to_vec()) }
}

impl<'a> From<&'a [String]> for Query<'a> {
    fn from(terms: &'a [String]) -> Self { Query::Terms(terms.iter().map(String::as_str).collect()) }
}

impl<'a> From<&'a Vec<String>> for Query<'a> {
    fn from(terms: &'a Vec<String>) -> Self { Query::from(terms.as_slice()) }
}

/// Union the postings of `terms`, deduplicating on first occurrence.
pub fn resolve<S: AsRef<str>>(postings: &Postings, terms: &[S]) -> Vec<DocId> {
    let mut seen: HashSet<DocId> = HashSet::new();
    let mut results = Vec::new();
    for term in terms {
        if let Some(ids) = postings.get(term.as_ref()) {
            for &id in ids {
                if seen.insert(id) {
                    results.push(id);
                }
            }
        }
    }
    results
}

impl InvertedIndex {
    /// Ids of the documents matching any term of `query`.
    pub fn search<'a>(&self, query: impl Into<Query<'a>>) -> Vec<DocId> {
        let terms = query.into().terms();
        let results = resolve(self.index(), &terms);
        tracing::trace!(num_terms = terms.len(), hits = results.len(), "resolved query");
        results
    }
}
