//! Chunked streaming aggregation of the MovieLens CSV files.
//!
//! This crate provides:
//! - `ChunkAggregator` trait describing transform / merge / finish for one dataset
//! - `process_chunks`, the driver that folds a chunked record stream
//! - Aggregators for ratings, genome scores and movie metadata
//! - `Ingestor`, which joins the three results and upserts one document per movie
//!
//! ## Architecture
//! Each dataset is processed in stages:
//! 1. `ChunkedReader` yields bounded chunks of typed rows
//! 2. `transform` reduces a chunk to a per-movie partial aggregate
//! 3. `merge` folds the partial into the running accumulator
//! 4. `finish` turns the accumulator into the final dataset
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{IngestConfig, Ingestor, IndicatifBar};
//! use store::JsonLinesStore;
//!
//! let ingestor = Ingestor::new(IngestConfig::with_data_dir("data/ml-25m"))?;
//! let mut store = JsonLinesStore::open(Path::new("data/movies.jsonl"))?;
//! let summary = ingestor.run(&mut store, &mut IndicatifBar::new(true))?;
//! ```

pub mod aggregators;
pub mod config;
pub mod driver;
pub mod error;
pub mod ingest;
pub mod progress;
pub mod traits;

// Re-export main types
pub use aggregators::{GenomeAggregator, MeanMode, MovieAggregator, RatingAggregator, RatingStat, TagScore};
pub use config::IngestConfig;
pub use driver::process_chunks;
pub use error::{PipelineError, Result};
pub use ingest::{IngestSummary, Ingestor};
pub use progress::{BoxBar, IndicatifBar, NullSink, ProgressWatermark, StatusSink};
pub use traits::ChunkAggregator;
