//! Crate-wide error type and `Result` alias.

use thiserror::Error;

/// Errors surfaced by the fundtrace pipeline.
#[derive(Debug, Error)]
pub enum FundTraceError {
    /// Any SQLite failure, including a rolled-back partition transaction.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A staging table is missing columns the engine requires. Raised before
    /// any traversal or mart write happens.
    #[error("missing required columns in {table}: {columns:?}")]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("invalid as-of date {input:?}: expected YYYY-MM-DD")]
    InvalidDate { input: String },
}

pub type Result<T, E = FundTraceError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
