//! Error types for wiki-search.

use thiserror::Error;

/// Result type alias using SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while answering a search.
///
/// An unknown term is not an error: lookups return an empty mapping for it.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The term index failed to answer a lookup.
    #[error("Lookup failed for term '{term}': {message}")]
    Lookup { term: String, message: String },

    /// The backing index could not be opened or reached.
    #[error("Index unavailable: {message}")]
    IndexUnavailable { message: String },

    /// The backing index rejected a write.
    #[error("Index write failed for term '{term}': {message}")]
    IndexWrite { term: String, message: String },

    /// Unrecognized boolean operator.
    #[error("Invalid operator: {value} (expected and, or, minus)")]
    InvalidOperator { value: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Internal error (unexpected).
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SearchError {
    /// Create a lookup error for a term.
    pub fn lookup(term: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Lookup {
            term: term.into(),
            message: message.into(),
        }
    }

    /// Create an index-unavailable error.
    pub fn index_unavailable(message: impl Into<String>) -> Self {
        Self::IndexUnavailable {
            message: message.into(),
        }
    }

    /// Create an index write error for a term.
    pub fn index_write(term: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IndexWrite {
            term: term.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Lookup { .. } => "LOOKUP_FAILED",
            Self::IndexUnavailable { .. } => "INDEX_UNAVAILABLE",
            Self::IndexWrite { .. } => "INDEX_WRITE_FAILED",
            Self::InvalidOperator { .. } => "INVALID_OPERATOR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
