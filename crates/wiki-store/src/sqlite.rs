//! SQLite-based term index.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, info};

use wiki_core::{DocId, Result, Score, SearchError, TermIndex};

use crate::memory::MemoryIndex;
use crate::schema::SCHEMA;

/// SQLite-backed term index.
///
/// Stores one row per (term, document) pair. The connection is guarded by a
/// blocking Mutex so the index can be shared across threads.
pub struct SqliteIndex {
    conn: Mutex<Connection>,
}

impl SqliteIndex {
    /// Open or create an index database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| SearchError::index_unavailable(format!("Failed to open index: {}", e)))?;

        info!("Index opened at {:?}", path);
        Self::init(conn)
    }

    /// Open an in-memory index (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            SearchError::index_unavailable(format!("Failed to open in-memory index: {}", e))
        })?;

        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 30000;
            "#,
        )
        .map_err(|e| SearchError::index_unavailable(format!("Failed to configure connection: {}", e)))?;

        conn.execute_batch(SCHEMA)
            .map_err(|e| SearchError::index_unavailable(format!("Failed to initialize schema: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Connection) -> Result<R>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| SearchError::internal(e.to_string()))?;
        f(&mut conn)
    }

    /// Record counts for a term, replacing the counts of documents already present.
    pub fn record_counts(&self, term: &str, counts: &HashMap<DocId, Score>) -> Result<()> {
        let write_err = |e: rusqlite::Error| SearchError::index_write(term, e.to_string());

        self.with_conn(|conn| {
            let tx = conn.transaction().map_err(write_err)?;
            {
                let mut stmt = tx
                    .prepare_cached(
                        "INSERT INTO term_counts (term, doc_id, count) VALUES (?1, ?2, ?3)
                         ON CONFLICT(term, doc_id) DO UPDATE SET count = excluded.count",
                    )
                    .map_err(write_err)?;

                for (doc_id, count) in counts {
                    let count = i64::try_from(*count).map_err(|_| {
                        SearchError::index_write(
                            term,
                            format!("count {} for {} exceeds the storable range", count, doc_id),
                        )
                    })?;
                    stmt.execute(params![term, doc_id, count])
                        .map_err(write_err)?;
                }
            }
            tx.commit().map_err(write_err)?;
            Ok(())
        })?;

        debug!("Recorded {} counts for {:?}", counts.len(), term);
        Ok(())
    }

    /// Copy every term of an in-memory index into this one.
    pub fn import(&self, source: &MemoryIndex) -> Result<usize> {
        let terms = source.terms();
        for term in &terms {
            let counts = source.lookup(term)?;
            self.record_counts(term, &counts)?;
        }
        info!("Imported {} terms", terms.len());
        Ok(terms.len())
    }

    /// Number of distinct terms in the index.
    pub fn term_count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(DISTINCT term) FROM term_counts", [], |row| {
                    row.get(0)
                })
                .map_err(|e| SearchError::index_unavailable(e.to_string()))?;
            Ok(count as usize)
        })
    }
}

impl TermIndex for SqliteIndex {
    fn lookup(&self, term: &str) -> Result<HashMap<DocId, Score>> {
        let read_err = |e: rusqlite::Error| SearchError::lookup(term, e.to_string());

        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare_cached("SELECT doc_id, count FROM term_counts WHERE term = ?1")
                .map_err(read_err)?;

            let rows = stmt
                .query_map(params![term], |row| {
                    let doc_id: String = row.get(0)?;
                    let count: i64 = row.get(1)?;
                    let count = Score::try_from(count)
                        .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(1, count))?;
                    Ok((doc_id, count))
                })
                .map_err(read_err)?;

            rows.collect::<std::result::Result<HashMap<_, _>, _>>()
                .map_err(read_err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, Score)]) -> HashMap<DocId, Score> {
        entries
            .iter()
            .map(|(id, count)| (id.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_open_memory() {
        let index = SqliteIndex::open_memory().unwrap();
        assert_eq!(index.term_count().unwrap(), 0);
        assert!(index.lookup("java").unwrap().is_empty());
    }

    #[test]
    fn test_record_and_lookup() {
        let index = SqliteIndex::open_memory().unwrap();
        index
            .record_counts("java", &counts(&[("doc1", 3), ("doc2", 5)]))
            .unwrap();
        index
            .record_counts("programming", &counts(&[("doc2", 2)]))
            .unwrap();

        assert_eq!(
            index.lookup("java").unwrap(),
            counts(&[("doc1", 3), ("doc2", 5)])
        );
        assert_eq!(index.term_count().unwrap(), 2);
    }

    #[test]
    fn test_record_replaces_existing_counts() {
        let index = SqliteIndex::open_memory().unwrap();
        index.record_counts("java", &counts(&[("doc1", 3)])).unwrap();
        index.record_counts("java", &counts(&[("doc1", 8)])).unwrap();

        assert_eq!(index.lookup("java").unwrap(), counts(&[("doc1", 8)]));
    }

    #[test]
    fn test_record_rejects_oversized_count() {
        let index = SqliteIndex::open_memory().unwrap();
        let err = index
            .record_counts("java", &counts(&[("doc1", Score::MAX)]))
            .unwrap_err();

        assert!(matches!(err, SearchError::IndexWrite { ref term, .. } if term == "java"));
        assert!(index.lookup("java").unwrap().is_empty());
    }

    #[test]
    fn test_lookup_rejects_negative_count() {
        let index = SqliteIndex::open_memory().unwrap();
        index
            .with_conn(|conn| {
                conn.execute_batch(
                    "DROP TABLE term_counts;
                     CREATE TABLE term_counts (term TEXT, doc_id TEXT, count INTEGER);
                     INSERT INTO term_counts VALUES ('java', 'doc1', -2);",
                )
                .map_err(|e| SearchError::internal(e.to_string()))
            })
            .unwrap();

        let err = index.lookup("java").unwrap_err();
        assert_eq!(err.error_code(), "LOOKUP_FAILED");
    }

    #[test]
    fn test_import_from_memory() {
        let mut source = MemoryIndex::new();
        source.insert("java", "doc1", 3);
        source.insert("coffee", "doc1", 1);

        let index = SqliteIndex::open_memory().unwrap();
        assert_eq!(index.import(&source).unwrap(), 2);
        assert_eq!(index.lookup("coffee").unwrap(), counts(&[("doc1", 1)]));
    }

    #[test]
    fn test_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("index.db");

        {
            let index = SqliteIndex::open(&path).unwrap();
            index.record_counts("java", &counts(&[("doc1", 3)])).unwrap();
        }

        let reopened = SqliteIndex::open(&path).unwrap();
        assert_eq!(reopened.lookup("java").unwrap(), counts(&[("doc1", 3)]));
    }
}
