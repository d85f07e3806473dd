//! Errors raised while loading a corpus.
//!
//! Indexing and searching never fail; only acquiring the documents can. Each
//! variant records where the documents were supposed to come from so the
//! message is useful at the CLI or HTTP edge.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    /// The source could not be opened or read.
    #[error("Unable to open file: {origin}")]
    SourceUnavailable {
        origin: String,
        #[source]
        cause: io::Error,
    },

    /// The source holds nothing but whitespace.
    #[error("The file is empty: {origin}")]
    EmptySource { origin: String },

    /// The content does not parse into an array of `{title, text}` objects.
    #[error("The file is not a valid JSON file: {origin}{}", line_suffix(.line))]
    MalformedSource {
        origin: String,
        /// 1-based line for JSON Lines sources.
        line: Option<usize>,
        #[source]
        cause: serde_json::Error,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" (line {n})"),
        None => String::new(),
    }
}

impl LoadError {
    pub fn origin(&self) -> &str {
        match self {
            LoadError::SourceUnavailable { origin, .. }
            | LoadError::EmptySource { origin }
            | LoadError::MalformedSource { origin, .. } => origin,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
