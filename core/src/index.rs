use crate::error::Result;
use crate::loader::load_books;
use crate::tokenizer::{analyze, normalize_term, StopWords};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Position of a document in the loaded corpus.
pub type DocId = u32;

/// Term -> ids of the documents containing it.
pub type Postings = HashMap<String, BTreeSet<DocId>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub text: String,
}

impl Document {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self { title: title.into(), text: text.into() }
    }

    /// Title and text joined by a single space; this is what gets indexed.
    pub fn content(&self) -> String {
        format!("{} {}", self.title, self.text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexConfig {
    pub stop_words: StopWords,
}

impl IndexConfig {
    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }
}

/// In-memory inverted index over a static corpus.
///
/// Built in one pass by [`InvertedIndex::create_index`]; every build replaces
/// the corpus and postings wholesale.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    config: IndexConfig,
    books: Vec<Document>,
    postings: Postings,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: IndexConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Index `books`, replacing whatever was indexed before.
    pub fn create_index(&mut self, books: Vec<Document>) {
        let mut postings = Postings::new();
        for (doc_id, book) in books.iter().enumerate() {
            let doc_id = doc_id as DocId;
            for term in analyze(&book.content(), &self.config.stop_words) {
                postings.entry(term).or_default().insert(doc_id);
            }
        }
        tracing::debug!(num_docs = books.len(), num_terms = postings.len(), "built index");
        self.books = books;
        self.postings = postings;
    }

    /// Load a corpus file and index it. On a load error the current
    /// contents are kept.
    pub fn create_index_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let books = load_books(path)?;
        self.create_index(books);
        Ok(())
    }

    pub fn index(&self) -> &Postings {
        &self.postings
    }

    pub fn books(&self) -> &[Document] {
        &self.books
    }

    pub fn book(&self, doc_id: DocId) -> Option<&Document> {
        self.books.get(doc_id as usize)
    }

    pub fn postings(&self, term: &str) -> Option<&BTreeSet<DocId>> {
        self.postings.get(&normalize_term(term))
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn num_docs(&self) -> usize {
        self.books.len()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Terms in lexical order with their ids ascending.
    pub fn sorted_terms(&self) -> Vec<(&str, Vec<DocId>)> {
        let mut terms: Vec<(&str, Vec<DocId>)> = self
            .postings
            .iter()
            .map(|(term, ids)| (term.as_str(), ids.iter().copied().collect()))
            .collect();
        terms.sort_unstable_by(|a, b| a.0.cmp(b.0));
        terms
    }
}
