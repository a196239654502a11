//! In-memory term index.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use wiki_core::{DocId, Result, Score, TermIndex};

/// Term index held entirely in memory.
///
/// The JSON form is an object of terms, each mapping document identifiers
/// to counts: `{ "java": { "https://en.wikipedia.org/wiki/Java": 12 } }`.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    terms: HashMap<String, HashMap<DocId, Score>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an index from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let terms: HashMap<String, HashMap<DocId, Score>> = serde_json::from_str(json)?;
        Ok(Self { terms })
    }

    /// Load an index from a JSON count file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let index = Self::from_json_str(&content)?;
        info!("Loaded {} terms from {:?}", index.terms.len(), path);
        Ok(index)
    }

    /// Set the count of a term in one document, replacing any previous count.
    pub fn insert(&mut self, term: impl Into<String>, doc_id: impl Into<DocId>, count: Score) {
        self.terms
            .entry(term.into())
            .or_default()
            .insert(doc_id.into(), count);
    }

    /// Add counts for a term, summing with counts already recorded.
    pub fn add_counts(&mut self, term: impl Into<String>, counts: HashMap<DocId, Score>) {
        let entry = self.terms.entry(term.into()).or_default();
        for (doc_id, count) in counts {
            let slot = entry.entry(doc_id).or_insert(0);
            *slot = slot.saturating_add(count);
        }
    }

    /// Known terms, sorted.
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.terms.keys().map(String::as_str).collect();
        terms.sort_unstable();
        terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl TermIndex for MemoryIndex {
    fn lookup(&self, term: &str) -> Result<HashMap<DocId, Score>> {
        Ok(self.terms.get(term).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_insert_and_lookup() {
        let mut index = MemoryIndex::new();
        index.insert("java", "doc1", 3);
        index.insert("java", "doc2", 5);
        index.insert("java", "doc1", 4);

        let counts = index.lookup("java").unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["doc1"], 4);
        assert!(index.lookup("cobol").unwrap().is_empty());
    }

    #[test]
    fn test_add_counts_sums() {
        let mut index = MemoryIndex::new();
        index.insert("java", "doc1", 3);
        index.add_counts(
            "java",
            HashMap::from([("doc1".to_string(), 2), ("doc9".to_string(), 1)]),
        );

        let counts = index.lookup("java").unwrap();
        assert_eq!(counts["doc1"], 5);
        assert_eq!(counts["doc9"], 1);
    }

    #[test]
    fn test_lookup_returns_a_copy() {
        let mut index = MemoryIndex::new();
        index.insert("java", "doc1", 3);

        let mut counts = index.lookup("java").unwrap();
        counts.insert("doc2".to_string(), 1);

        assert_eq!(index.lookup("java").unwrap().len(), 1);
    }

    #[test]
    fn test_from_json() {
        let index = MemoryIndex::from_json_str(
            r#"{"java": {"doc1": 3, "doc2": 5}, "programming": {"doc2": 2}}"#,
        )
        .unwrap();

        assert_eq!(index.terms(), vec!["java", "programming"]);
        assert_eq!(index.lookup("programming").unwrap()["doc2"], 2);
    }

    #[test]
    fn test_from_json_rejects_negative_counts() {
        let err = MemoryIndex::from_json_str(r#"{"java": {"doc1": -1}}"#).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"java": {{"doc1": 3}}}}"#).unwrap();

        let index = MemoryIndex::load(file.path()).unwrap();
        assert_eq!(index.len(), 1);

        let missing = MemoryIndex::load(file.path().with_extension("missing"));
        assert_eq!(missing.unwrap_err().error_code(), "IO_ERROR");
    }
}
