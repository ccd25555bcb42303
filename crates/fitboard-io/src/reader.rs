//! Table reader trait and common error types

use crate::table::Table;
use thiserror::Error;

/// Errors that can occur while resolving or reading a dataset
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        IoError::Io(err.to_string())
    }
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Anything that can produce a whole [`Table`] in one read
pub trait TableReader {
    /// Read every record into a table
    fn read_table(&self) -> IoResult<Table>;

    /// Get the format name
    fn format_name(&self) -> &'static str;

    /// Get the source path (if applicable)
    fn path(&self) -> Option<&str> {
        None
    }
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    vec!["csv", "tsv"]
}
