use anyhow::{bail, Context, Result};
use booksearch_core::{DocId, IndexConfig, InvertedIndex, Query, StopWords};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an inverted index over a book corpus and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Corpus file: a JSON array of {title, text} objects, or .jsonl
    #[arg(long)]
    input: String,
    /// Comma-separated stop words replacing the built-in English list
    #[arg(long, value_delimiter = ',', conflicts_with = "no_stop_words")]
    stop_words: Option<Vec<String>>,
    /// Index every term, stop words included
    #[arg(long, default_value_t = false)]
    no_stop_words: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print a summary
    Build {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Print every term with its document ids
        #[arg(long, default_value_t = false)]
        dump: bool,
    },
    /// Build the index and run one query against it
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Free-text query
        #[arg(long, conflicts_with = "term")]
        query: Option<String>,
        /// A pre-split query term; repeat for more
        #[arg(long)]
        term: Vec<String>,
    },
}

#[derive(Serialize)]
struct Summary {
    num_docs: usize,
    num_terms: usize,
}

#[derive(Serialize)]
struct Hit<'a> {
    doc_id: DocId,
    title: &'a str,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, dump } => {
            let index = build_index(&corpus)?;
            if dump {
                let terms: BTreeMap<&str, Vec<DocId>> = index.sorted_terms().into_iter().collect();
                print_json(&terms)
            } else {
                print_json(&Summary { num_docs: index.num_docs(), num_terms: index.num_terms() })
            }
        }
        Commands::Search { corpus, query, term } => {
            let index = build_index(&corpus)?;
            let query = match &query {
                Some(text) => Query::from(text),
                None if !term.is_empty() => Query::from(&term),
                None => bail!("either --query or at least one --term is required"),
            };
            let hits: Vec<Hit> = index
                .search(query)
                .into_iter()
                .filter_map(|doc_id| index.book(doc_id).map(|b| Hit { doc_id, title: &b.title }))
                .collect();
            tracing::info!(hits = hits.len(), "search complete");
            print_json(&hits)
        }
    }
}

fn stop_words(args: &CorpusArgs) -> StopWords {
    if args.no_stop_words {
        StopWords::none()
    } else if let Some(words) = &args.stop_words {
        StopWords::new(words)
    } else {
        StopWords::default()
    }
}

fn build_index(args: &CorpusArgs) -> Result<InvertedIndex> {
    let config = IndexConfig::default().with_stop_words(stop_words(args));
    let mut index = InvertedIndex::with_config(config);
    index
        .create_index_from_path(&args.input)
        .with_context(|| format!("failed to index {}", args.input))?;
    tracing::info!(input = %args.input, num_docs = index.num_docs(), num_terms = index.num_terms(), "index build complete");
    Ok(index)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
