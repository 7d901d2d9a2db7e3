//! Error types for the extraction and aggregation pipeline.
//!
//! The core never presents or logs its own failures. Every failure path
//! returns one of these classified errors and the caller decides how to
//! show it.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of a line source: opening it, fetching it, or reading from it.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The document URL could not be used.
    #[error("invalid document URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A local document could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote document could not be fetched.
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote document is larger than the configured limit.
    #[error("document at {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: u64 },

    /// The source failed while being iterated.
    #[error("read failed at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of a [`crate::store::WordStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `increment_word` was called before `ensure_schema`.
    #[error("store schema is not initialized")]
    NotInitialized,

    /// Filesystem access failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The database rejected a statement or could not be opened.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The key cannot be stored (empty).
    #[error("invalid word key {0:?}")]
    InvalidWord(String),

    /// Any other backend failure.
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Error returned by the pipeline entry points.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Error reading text: {0}")]
    SourceRead(#[from] SourceError),

    #[error("Error updating word occurrences: {0}")]
    Store(#[from] StoreError),
}

/// Convenience Result type for the pipeline.
pub type Result<T> = std::result::Result<T, AnalysisError>;
