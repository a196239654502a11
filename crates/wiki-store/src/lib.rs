//! wiki-store - Term index backends
//!
//! This crate provides the term lookup collaborators used by wiki-search:
//! an in-memory index loadable from a JSON count file, and a SQLite index
//! holding one row per (term, document) pair.

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryIndex;
pub use sqlite::SqliteIndex;

// Re-export schema for testing/migrations
pub use schema::SCHEMA;
