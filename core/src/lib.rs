//! In-memory inverted index over a small corpus of books.
//!
//! ```
//! use booksearch_core::{Document, InvertedIndex};
//!
//! let mut index = InvertedIndex::new();
//! index.create_index(vec![
//!     Document::new("Alice in Wonderland", "Alice falls into a rabbit hole."),
//!     Document::new("The Hobbit", "There and back again."),
//! ]);
//! assert_eq!(index.search("alice hobbit"), vec![0, 1]);
//! ```

pub mod error;
pub mod index;
pub mod loader;
pub mod query;
pub mod tokenizer;

pub use error::{LoadError, Result};
pub use index::{DocId, Document, IndexConfig, InvertedIndex, Postings};
pub use loader::{load_books, parse_books, parse_books_jsonl};
pub use query::{resolve, Query};
pub use tokenizer::{StopWords, DEFAULT_STOP_WORDS};
