//! Error types for the document store.

use data_loader::MovieId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The store refused a document
    #[error("Failed to write movie {movie_id}: {reason}")]
    SinkWrite { movie_id: MovieId, reason: String },

    /// An existing store file holds a line that is not a document
    #[error("Corrupt store entry at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
