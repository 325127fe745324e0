//! Errors raised while building a table

use thiserror::Error;

/// Errors that can occur when constructing columns or loading configuration.
///
/// Interactive requests (sort clicks, filter edits, page changes) never
/// produce these; they are ignored instead.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Column accessor must not be empty")]
    EmptyAccessor,

    #[error("Duplicate column accessor: {0}")]
    DuplicateAccessor(String),

    #[error("Select column '{0}' has no options")]
    MissingSelectOptions(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
