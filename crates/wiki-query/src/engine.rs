//! Query engine composing per-term lookups into boolean queries.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use wiki_core::{Operator, Result, TermIndex};

use crate::result_set::ResultSet;

/// Multi-term query engine.
///
/// Looks up each term in the index and folds the per-term result sets
/// left to right. Every step allocates a fresh set, so intermediate results
/// are never shared.
pub struct QueryEngine<I: ?Sized> {
    /// Term index.
    index: Arc<I>,
}

impl<I> QueryEngine<I>
where
    I: TermIndex + ?Sized,
{
    /// Create a new query engine.
    pub fn new(index: Arc<I>) -> Self {
        Self { index }
    }

    /// Search for a single term.
    pub fn search(&self, term: &str) -> Result<ResultSet> {
        ResultSet::from_lookup(term, self.index.as_ref())
    }

    /// Search for every term and fold them with one operator.
    ///
    /// No terms gives an empty result set.
    pub fn search_all<S: AsRef<str>>(&self, op: Operator, terms: &[S]) -> Result<ResultSet> {
        let Some((first, rest)) = terms.split_first() else {
            return Ok(ResultSet::default());
        };

        let steps: Vec<(Operator, &str)> = rest.iter().map(|t| (op, t.as_ref())).collect();
        self.evaluate(first.as_ref(), &steps)
    }

    /// Evaluate `first op1 t1 op2 t2 ...` strictly left to right.
    ///
    /// The first failing lookup aborts evaluation and its error is returned.
    pub fn evaluate<S: AsRef<str>>(&self, first: &str, steps: &[(Operator, S)]) -> Result<ResultSet> {
        let start = Instant::now();

        let mut result = self.search(first)?;

        for (op, term) in steps {
            let term = term.as_ref();
            let next = self.search(term)?;
            result = result.combine(*op, &next);
            debug!("{} {:?} -> {} documents", op, term, result.len());
        }

        info!(
            "Query over {} term(s) completed in {}ms, {} documents",
            steps.len() + 1,
            start.elapsed().as_millis(),
            result.len()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiki_core::{DocId, Score, SearchError};

    struct Counts(HashMap<&'static str, Vec<(&'static str, Score)>>);

    impl TermIndex for Counts {
        fn lookup(&self, term: &str) -> Result<HashMap<DocId, Score>> {
            Ok(self
                .0
                .get(term)
                .map(|docs| docs.iter().map(|(d, s)| (d.to_string(), *s)).collect())
                .unwrap_or_default())
        }
    }

    fn index() -> Arc<Counts> {
        let mut terms = HashMap::new();
        terms.insert("java", vec![("doc1", 3), ("doc2", 5)]);
        terms.insert("programming", vec![("doc2", 2), ("doc3", 4)]);
        terms.insert("coffee", vec![("doc1", 1)]);
        Arc::new(Counts(terms))
    }

    /// Fails on the n-th lookup, counting from zero.
    struct FailsAt {
        inner: Arc<Counts>,
        fail_at: usize,
        calls: AtomicUsize,
    }

    impl TermIndex for FailsAt {
        fn lookup(&self, term: &str) -> Result<HashMap<DocId, Score>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == self.fail_at {
                return Err(SearchError::lookup(term, "timed out"));
            }
            self.inner.lookup(term)
        }
    }

    #[test]
    fn test_search_single_term() {
        let engine = QueryEngine::new(index());
        let java = engine.search("java").unwrap();
        assert_eq!(java.len(), 2);
        assert_eq!(java.relevance("doc2"), 5);
        assert!(engine.search("haskell").unwrap().is_empty());
    }

    #[test]
    fn test_search_all_matches_manual_fold() {
        let engine = QueryEngine::new(index());
        let java = engine.search("java").unwrap();
        let programming = engine.search("programming").unwrap();

        let both = engine
            .search_all(Operator::And, &["java", "programming"])
            .unwrap();
        assert_eq!(both, java.and(&programming));

        let either = engine
            .search_all(Operator::Or, &["java", "programming"])
            .unwrap();
        assert_eq!(either, java.or(&programming));
    }

    #[test]
    fn test_search_all_empty_terms() {
        let engine = QueryEngine::new(index());
        let none: [&str; 0] = [];
        assert!(engine.search_all(Operator::Or, &none).unwrap().is_empty());
    }

    #[test]
    fn test_evaluate_left_to_right() {
        let engine = QueryEngine::new(index());
        let result = engine
            .evaluate(
                "java",
                &[(Operator::Or, "programming"), (Operator::Minus, "coffee")],
            )
            .unwrap();

        let ranked = result.sort();
        let ids: Vec<_> = ranked.iter().map(|e| e.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["doc3", "doc2"]);
        assert_eq!(result.relevance("doc2"), 7);
    }

    #[test]
    fn test_lookup_failure_propagates() {
        let failing = Arc::new(FailsAt {
            inner: index(),
            fail_at: 1,
            calls: AtomicUsize::new(0),
        });
        let engine = QueryEngine::new(failing);

        let err = engine
            .search_all(Operator::And, &["java", "programming", "coffee"])
            .unwrap_err();
        match err {
            SearchError::Lookup { term, message } => {
                assert_eq!(term, "programming");
                assert_eq!(message, "timed out");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_engine_over_trait_object() {
        let shared: Arc<dyn TermIndex> = index();
        let engine = QueryEngine::new(shared);
        assert_eq!(engine.search("coffee").unwrap().relevance("doc1"), 1);
    }
}
