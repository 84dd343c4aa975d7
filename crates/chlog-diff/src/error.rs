//! Error types for the diff crate.
//!
//! The engine itself never fails; these cover loading configuration and
//! reading change-log documents from outside.

use std::path::PathBuf;

/// Errors that can occur around the diff engine.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The configuration text was not valid.
    #[error("invalid diff configuration: {0}")]
    Config(String),

    /// A file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A change-log document could not be decoded.
    #[error("change log document error: {0}")]
    Document(#[from] chlog_types::TypeError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
