//! wiki-core - Core types and traits for wiki-search
//!
//! This crate provides the shared types, the term lookup trait, configuration
//! and error handling used throughout the wiki-search workspace.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::{Result, SearchError};
pub use traits::*;
pub use types::*;
