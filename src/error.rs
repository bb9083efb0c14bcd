//! Error types for querypad.

use crate::connection::FieldError;

/// Errors raised outside the highlighter core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (terminal, input files, exports).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize results as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The new-connection form did not validate.
    #[error("Invalid connection: {0}")]
    InvalidConnection(FieldError),

    /// Nothing to execute.
    #[error("Query is empty")]
    EmptyQuery,

    /// Export requested before any query produced results.
    #[error("No results to export")]
    NoResults,
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
