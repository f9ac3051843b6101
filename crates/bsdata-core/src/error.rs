//! Error types for bsdata-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bsdata-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog XML is not well-formed
    #[error("failed to parse catalog '{path}': {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    /// No catalog matched the requested faction name
    #[error("no catalog found for faction '{faction}'")]
    CatalogNotFound {
        faction: String,
        /// Catalog stems available in the repo, for the caller to list
        available: Vec<String>,
    },

    /// Stored dataset cannot be compared
    #[error("stored data is malformed: {0}")]
    StoredData(String),

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
