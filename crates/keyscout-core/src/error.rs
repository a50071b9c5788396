//! # Error Types
//!
//! Defines `KeyScoutError`, the unified error enum for every fatal failure in
//! the KeyScout pipeline. Recoverable problems (a column that cannot be
//! profiled, a column pair whose types cannot be compared, a file that fails
//! to load in a multi-file batch) never surface here; they are logged and the
//! affected unit of work is skipped or degraded.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can occur in KeyScout operations.
#[derive(Error, Debug)]
pub enum KeyScoutError {
    #[error("Table '{table}' is not rectangular: column '{column}' has {actual} values but the table has {expected} rows")]
    RaggedTable {
        table: String,
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Table '{table}' was supplied more than once. Table names must be unique within a run")]
    DuplicateTable { table: String },

    #[error("Table '{table}' has more than one column named '{column}'")]
    DuplicateColumn { table: String, column: String },

    #[error("No profile or key set was computed for table '{table}'")]
    MissingProfile { table: String },

    #[error("Failed to ingest {}: {message}", path.display())]
    Ingest { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Relationship store error: {message}")]
    Store { message: String },

    #[error("I/O error: {message}: {source}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build worker pool: {message}")]
    ThreadPool { message: String },
}

pub type Result<T> = std::result::Result<T, KeyScoutError>;
