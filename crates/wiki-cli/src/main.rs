//! wiki-search CLI - Boolean term queries over a term index.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use wiki_core::{Operator, SearchConfig, SearchError, TermIndex};
use wiki_query::{QueryEngine, RankedEntry, ResultSet};
use wiki_store::{MemoryIndex, SqliteIndex};

/// wiki-search - Rank documents by term frequency for boolean term queries
#[derive(Parser)]
#[command(name = "wiki-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Index path: a .json count file or a SQLite database
    #[arg(short, long, global = true)]
    index: Option<PathBuf>,

    /// Config file (default: ~/.config/wiki-search/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine the results of several terms
    Query {
        /// Query terms, folded left to right
        #[arg(required = true)]
        terms: Vec<String>,

        /// Operator joining the terms (and, or, minus)
        #[arg(short, long)]
        op: Option<Operator>,

        /// Remove documents containing this term
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// Keep only the N most relevant documents
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the results for a single term
    Lookup {
        /// Term to look up
        term: String,
    },

    /// Copy a JSON count file into a SQLite index
    Import {
        /// JSON count file
        source: PathBuf,

        /// SQLite database to write
        #[arg(long)]
        db: PathBuf,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<&Path>) -> Result<SearchConfig, SearchError> {
    match path {
        Some(path) => SearchConfig::load(path),
        None => SearchConfig::load_default(),
    }
}

/// Open the index named by `path`, choosing the backend from its extension.
fn open_index(path: &Path) -> Result<Arc<dyn TermIndex>, SearchError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        debug!("Using JSON index at {:?}", path);
        Ok(Arc::new(MemoryIndex::load(path)?))
    } else {
        if !path.exists() {
            return Err(SearchError::index_unavailable(format!(
                "No index at {}",
                path.display()
            )));
        }
        debug!("Using SQLite index at {:?}", path);
        Ok(Arc::new(SqliteIndex::open(path)?))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli) -> Result<(), SearchError> {
    let config = load_config(cli.config.as_deref())?;
    let index_path = cli.index.unwrap_or_else(|| config.index.path.clone());

    match cli.command {
        Commands::Query {
            terms,
            op,
            exclude,
            limit,
            json,
        } => {
            let engine = QueryEngine::new(open_index(&index_path)?);
            let op = op.unwrap_or(config.query.default_operator);
            let results = query(&engine, op, &terms, &exclude)?;
            let ranked = rank(&results, limit.or(config.query.limit));
            print_ranked(&ranked, json || config.output.json)?;
        }
        Commands::Lookup { term } => {
            let engine = QueryEngine::new(open_index(&index_path)?);
            println!("Query: {}", term);
            print_ranked(&engine.search(&term)?.sort(), false)?;
        }
        Commands::Import { source, db } => {
            let memory = MemoryIndex::load(&source)?;
            let count = SqliteIndex::open(&db)?.import(&memory)?;
            println!("Imported {} terms into {}", count, db.display());
        }
    }

    Ok(())
}

fn query(
    engine: &QueryEngine<dyn TermIndex>,
    op: Operator,
    terms: &[String],
    exclude: &[String],
) -> Result<ResultSet, SearchError> {
    let steps: Vec<(Operator, &str)> = terms
        .iter()
        .skip(1)
        .map(|t| (op, t.as_str()))
        .chain(exclude.iter().map(|t| (Operator::Minus, t.as_str())))
        .collect();

    match terms.first() {
        Some(first) => engine.evaluate(first, &steps),
        None => Ok(ResultSet::default()),
    }
}

/// Ascending by relevance; with a limit, the `limit` best in ascending order.
fn rank(results: &ResultSet, limit: Option<usize>) -> Vec<RankedEntry> {
    match limit {
        Some(n) => {
            let mut best = results.top(n);
            best.sort_by(|a, b| {
                a.score
                    .cmp(&b.score)
                    .then_with(|| a.doc_id.cmp(&b.doc_id))
            });
            best
        }
        None => results.sort(),
    }
}

fn print_ranked(ranked: &[RankedEntry], json: bool) -> Result<(), SearchError> {
    if json {
        println!("{}", serde_json::to_string_pretty(ranked)?);
    } else {
        for entry in ranked {
            println!("{}", entry);
        }
    }
    Ok(())
}
