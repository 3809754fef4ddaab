//! Error types for dataset storage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make the dataset store unavailable.
///
/// Every variant means the dataset could not be read or written; callers
/// treat them all as fatal for the session.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error while opening or writing the dataset file
    #[error("IO error on {path:?}: {source}")]
    Io {
        /// File that was being accessed
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing or serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The temporary file could not be moved over the dataset
    #[error("Failed to replace dataset file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Required column is missing from the header
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// Name of the missing column
        column: String,
    },

    /// A cell holds a value that cannot be interpreted
    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        /// Zero-based data row
        row: usize,
        /// Column name
        column: String,
        /// The offending cell
        value: String,
    },
}

impl StoreError {
    /// Create an I/O error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            row,
            column: column.into(),
            value: value.into(),
        }
    }
}
