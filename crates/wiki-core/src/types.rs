//! Core domain types for wiki-search.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// Opaque document identifier, usually a URL.
pub type DocId = String;

/// Relevance score: a term frequency or a sum of them.
pub type Score = u64;

/// One row of a ranked result listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Document identifier.
    pub doc_id: DocId,

    /// Relevance score.
    pub score: Score,
}

impl RankedEntry {
    pub fn new(doc_id: impl Into<DocId>, score: Score) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
        }
    }
}

impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.doc_id, self.score)
    }
}

/// Boolean operator joining two result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Intersection: documents matching both sides.
    #[default]
    And,
    /// Union: documents matching either side.
    Or,
    /// Difference: documents on the left that are absent on the right.
    Minus,
}

impl FromStr for Operator {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" | "&" => Ok(Self::And),
            "or" | "|" => Ok(Self::Or),
            "minus" | "not" | "-" => Ok(Self::Minus),
            _ => Err(SearchError::InvalidOperator {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Minus => "MINUS",
        };
        write!(f, "{}", s)
    }
}
