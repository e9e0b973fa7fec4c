//! Error types for the data-loader crate.
//!
//! Every failure while reading a MovieLens CSV file ends up here. None of
//! them are recoverable inside a run: the caller aborts and reports.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or reading a record stream
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The source file could not be opened (missing, unreadable, ...)
    ///
    /// Raised before any chunk is produced.
    #[error("Source unavailable: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row failed field count or type coercion
    #[error("Malformed record at line {line} in {file}: {reason}")]
    MalformedRecord {
        file: String,
        line: u64,
        reason: String,
    },

    /// The header row lacks a column the record type requires
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// I/O error occurred while reading an already opened file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataLoadError {
    /// Convert a `csv` error into the matching variant, keeping the line number
    /// the reader reports.
    pub(crate) fn from_csv(file: &str, err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => DataLoadError::Io(io),
            csv::ErrorKind::Deserialize { err, .. } => DataLoadError::MalformedRecord {
                file: file.to_string(),
                line,
                reason: err.to_string(),
            },
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => DataLoadError::MalformedRecord {
                file: file.to_string(),
                line,
                reason: format!("expected {} fields but found {}", expected_len, len),
            },
            other => DataLoadError::MalformedRecord {
                file: file.to_string(),
                line,
                reason: format!("{:?}", other),
            },
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
