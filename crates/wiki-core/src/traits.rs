//! Core traits defining the interfaces between components.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{DocId, Score};

/// Term lookup collaborator.
///
/// Maps a query term to the documents containing it and the term's
/// frequency in each. Implementations must return an empty map for a term
/// with no matches; errors are reserved for a failing backing store.
pub trait TermIndex: Send + Sync {
    /// Get the per-document counts for a term.
    fn lookup(&self, term: &str) -> Result<HashMap<DocId, Score>>;
}

impl<T: TermIndex + ?Sized> TermIndex for &T {
    fn lookup(&self, term: &str) -> Result<HashMap<DocId, Score>> {
        (**self).lookup(term)
    }
}

impl<T: TermIndex + ?Sized> TermIndex for Arc<T> {
    fn lookup(&self, term: &str) -> Result<HashMap<DocId, Score>> {
        (**self).lookup(term)
    }
}
