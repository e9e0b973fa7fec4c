//! Configuration for one ingest run.

use crate::aggregators::MeanMode;
use crate::aggregators::genome::DEFAULT_TOP_TAGS;
use crate::error::{PipelineError, Result};
use data_loader::{DEFAULT_CHUNK_SIZE, YearPattern};
use std::path::{Path, PathBuf};

/// Chunk count estimates for MovieLens 25M at the default chunk size.
/// Only used for progress granularity.
pub const EXPECTED_RATING_CHUNKS: usize = 500;
pub const EXPECTED_GENOME_CHUNKS: usize = 311;
pub const EXPECTED_MOVIE_CHUNKS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    /// Directory holding ratings.csv, movies.csv, genome-scores.csv
    pub data_dir: PathBuf,
    /// Rows per chunk
    pub chunk_size: usize,
    /// Genome tags kept per movie
    pub top_tags: usize,
    pub mean_mode: MeanMode,
    pub year_pattern: YearPattern,
    pub expected_rating_chunks: usize,
    pub expected_genome_chunks: usize,
    pub expected_movie_chunks: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/ml-25m"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            top_tags: DEFAULT_TOP_TAGS,
            mean_mode: MeanMode::default(),
            year_pattern: YearPattern::default(),
            expected_rating_chunks: EXPECTED_RATING_CHUNKS,
            expected_genome_chunks: EXPECTED_GENOME_CHUNKS,
            expected_movie_chunks: EXPECTED_MOVIE_CHUNKS,
        }
    }
}

impl IngestConfig {
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        if self.top_tags == 0 {
            return Err(PipelineError::InvalidConfig(
                "top_tags must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ratings_path(&self) -> PathBuf {
        self.data_dir.join("ratings.csv")
    }

    pub fn movies_path(&self) -> PathBuf {
        self.data_dir.join("movies.csv")
    }

    pub fn genome_scores_path(&self) -> PathBuf {
        self.data_dir.join("genome-scores.csv")
    }

    pub fn genome_tags_path(&self) -> PathBuf {
        self.data_dir.join("genome-tags.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = IngestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, 50_000);
        assert_eq!(config.mean_mode, MeanMode::Weighted);
        assert_eq!(config.ratings_path(), PathBuf::from("data/ml-25m/ratings.csv"));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = IngestConfig {
            chunk_size: 0,
            ..IngestConfig::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));
    }
}
