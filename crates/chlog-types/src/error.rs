use thiserror::Error;

/// Errors produced while reading change-log documents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("malformed change log document: {0}")]
    MalformedDocument(String),

    #[error("expected a change log entry or a list of change records, got {0}")]
    UnexpectedShape(String),
}
