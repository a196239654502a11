//! Database schema definitions.

/// Main schema SQL for initializing the database.
pub const SCHEMA: &str = r#"
-- Term frequency per document
CREATE TABLE IF NOT EXISTS term_counts (
    term TEXT NOT NULL,
    doc_id TEXT NOT NULL,
    count INTEGER NOT NULL CHECK (count >= 0),
    PRIMARY KEY (term, doc_id)
);
"#;
