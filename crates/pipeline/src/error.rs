//! Error types for the aggregation pipeline.

use data_loader::DataLoadError;
use store::StoreError;
use thiserror::Error;

/// Everything that can abort an ingest run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A source could not be opened or held a malformed row
    #[error(transparent)]
    Load(#[from] DataLoadError),

    /// The document store rejected a write
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
