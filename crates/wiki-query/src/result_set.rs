//! Search results and the algebra that combines them.

use std::collections::HashMap;
use std::ops::{BitAnd, BitOr, Sub};

use serde::{Deserialize, Serialize};
use tracing::debug;

use wiki_core::{DocId, Operator, RankedEntry, Result, Score, TermIndex};

/// Combine the relevance two sides contribute for the same document.
///
/// Relevance is the sum of the term frequencies.
pub fn total_relevance(left: Score, right: Score) -> Score {
    left.saturating_add(right)
}

/// Result of a search: document identifier to relevance score.
///
/// Combinators never modify their operands; each returns a new set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    scores: HashMap<DocId, Score>,
}

impl ResultSet {
    /// Wrap an owned score mapping.
    pub fn new(scores: HashMap<DocId, Score>) -> Self {
        Self { scores }
    }

    /// Look up a single term and wrap its counts.
    ///
    /// An unknown term gives an empty set. Lookup errors are returned as-is.
    pub fn from_lookup<I: TermIndex + ?Sized>(term: &str, index: &I) -> Result<Self> {
        let scores = index.lookup(term)?;
        debug!("Lookup {:?} matched {} documents", term, scores.len());
        Ok(Self::new(scores))
    }

    /// Relevance of a document, zero if it is not in the set.
    pub fn relevance(&self, doc_id: &str) -> Score {
        self.scores.get(doc_id).copied().unwrap_or(0)
    }

    /// Whether the document is present as a key.
    pub fn contains(&self, doc_id: &str) -> bool {
        self.scores.contains_key(doc_id)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate over the document identifiers, in no particular order.
    pub fn doc_ids(&self) -> impl Iterator<Item = &DocId> {
        self.scores.keys()
    }

    /// Iterate over `(doc_id, score)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&DocId, Score)> {
        self.scores.iter().map(|(id, score)| (id, *score))
    }

    /// Release the underlying mapping.
    pub fn into_scores(self) -> HashMap<DocId, Score> {
        self.scores
    }

    /// Union: documents in either set, scored by the sum of both sides.
    pub fn or(&self, other: &ResultSet) -> ResultSet {
        let mut scores: HashMap<DocId, Score> = HashMap::with_capacity(self.len() + other.len());

        for doc_id in self.doc_ids().chain(other.doc_ids()) {
            if scores.contains_key(doc_id.as_str()) {
                continue;
            }
            let score = total_relevance(self.relevance(doc_id), other.relevance(doc_id));
            scores.insert(doc_id.clone(), score);
        }

        ResultSet::new(scores)
    }

    /// Intersection: documents present as keys in both sets, scored by the sum.
    ///
    /// Membership depends on key presence, so a stored zero still counts.
    pub fn and(&self, other: &ResultSet) -> ResultSet {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };

        let scores = small
            .doc_ids()
            .filter(|doc_id| large.contains(doc_id))
            .map(|doc_id| {
                let score = total_relevance(self.relevance(doc_id), other.relevance(doc_id));
                (doc_id.clone(), score)
            })
            .collect();

        ResultSet::new(scores)
    }

    /// Difference: documents in this set whose key is absent from `other`.
    pub fn minus(&self, other: &ResultSet) -> ResultSet {
        self.iter()
            .filter(|(doc_id, _)| !other.contains(doc_id))
            .map(|(doc_id, score)| (doc_id.clone(), score))
            .collect()
    }

    /// Apply the combinator named by `op`.
    pub fn combine(&self, op: Operator, other: &ResultSet) -> ResultSet {
        match op {
            Operator::And => self.and(other),
            Operator::Or => self.or(other),
            Operator::Minus => self.minus(other),
        }
    }

    /// All entries by ascending score, ties ordered by document identifier.
    pub fn sort(&self) -> Vec<RankedEntry> {
        let mut ranked = self.entries();
        ranked.sort_by(|a, b| rank_key(a).cmp(&rank_key(b)));
        ranked
    }

    /// The `n` best entries, highest score first.
    ///
    /// Ties are ordered by document identifier, ascending.
    pub fn top(&self, n: usize) -> Vec<RankedEntry> {
        let mut ranked = self.entries();
        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        ranked.truncate(n);
        ranked
    }

    fn entries(&self) -> Vec<RankedEntry> {
        self.iter()
            .map(|(doc_id, score)| RankedEntry::new(doc_id.clone(), score))
            .collect()
    }
}

fn rank_key(entry: &RankedEntry) -> (Score, &str) {
    (entry.score, entry.doc_id.as_str())
}

impl From<HashMap<DocId, Score>> for ResultSet {
    fn from(scores: HashMap<DocId, Score>) -> Self {
        Self::new(scores)
    }
}

impl FromIterator<(DocId, Score)> for ResultSet {
    fn from_iter<T: IntoIterator<Item = (DocId, Score)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl BitOr for &ResultSet {
    type Output = ResultSet;

    fn bitor(self, rhs: &ResultSet) -> ResultSet {
        self.or(rhs)
    }
}

impl BitAnd for &ResultSet {
    type Output = ResultSet;

    fn bitand(self, rhs: &ResultSet) -> ResultSet {
        self.and(rhs)
    }
}

impl Sub for &ResultSet {
    type Output = ResultSet;

    fn sub(self, rhs: &ResultSet) -> ResultSet {
        self.minus(rhs)
    }
}
