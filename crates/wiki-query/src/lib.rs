//! wiki-query - Result-set algebra and ranking
//!
//! This crate combines per-term search results into answers for
//! multi-term queries.
//!
//! # Features
//!
//! - Union, intersection and difference of result sets
//! - Relevance as the sum of term frequencies, zero when absent
//! - Deterministic ascending ranking and a best-first `top`
//! - Left-to-right folding of boolean queries over a term index
//!
//! # Example
//!
//! ```rust,ignore
//! use wiki_query::{Operator, QueryEngine};
//! use std::sync::Arc;
//!
//! let engine = QueryEngine::new(Arc::new(index));
//! let results = engine.search_all(Operator::And, &["java", "programming"])?;
//! for entry in results.sort() {
//!     println!("{}", entry);
//! }
//! ```

mod engine;
mod result_set;

pub use engine::QueryEngine;
pub use result_set::{total_relevance, ResultSet};

// Re-export for convenience
pub use wiki_core::{Operator, RankedEntry};
