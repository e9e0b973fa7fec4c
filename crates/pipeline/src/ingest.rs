//! End-to-end ingest: aggregate the three datasets, join them per movie and
//! upsert one document per movie into a store.
//!
//! The store and the status sink are passed in by the caller; the ingestor
//! holds nothing across runs.

use crate::aggregators::{GenomeAggregator, MeanMode, MovieAggregator, RatingAggregator, RatingStat};
use crate::config::IngestConfig;
use crate::driver::process_chunks;
use crate::error::Result;
use crate::progress::StatusSink;
use data_loader::{ChunkedReader, GenomeScore, Movie, MovieId, MovieRecord, Rating, TagId};
use std::collections::BTreeMap;
use store::{DocumentStore, MovieDocument};
use tracing::{info, warn};

/// What a run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub movies_written: usize,
    /// Written documents that carry a rating
    pub rated_movies: usize,
    /// Written documents that carry genome tags
    pub tagged_movies: usize,
    /// Movie ids with ratings but no `movies.csv` row
    pub orphan_rating_keys: usize,
    /// Movie ids with genome scores but no `movies.csv` row
    pub orphan_genome_keys: usize,
}

pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    /// Create an ingestor; fails on an invalid configuration
    pub fn new(config: IngestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Run the whole pipeline once.
    ///
    /// ## Steps
    /// 1. Open every source (a missing file fails before any chunk is read)
    /// 2. Aggregate ratings, then genome scores, then movie metadata
    /// 3. Join on movie id in `movies.csv` order and upsert each document
    /// 4. Flush the store
    pub fn run(
        &self,
        store: &mut dyn DocumentStore,
        sink: &mut dyn StatusSink,
    ) -> Result<IngestSummary> {
        let config = &self.config;
        info!("Reading data from {}", config.data_dir.display());

        let ratings = ChunkedReader::<Rating>::open(&config.ratings_path(), config.chunk_size)?;
        let genome =
            ChunkedReader::<GenomeScore>::open(&config.genome_scores_path(), config.chunk_size)?;
        let movies = ChunkedReader::<MovieRecord>::open(&config.movies_path(), config.chunk_size)?;

        if config.mean_mode == MeanMode::ChunkMean {
            warn!("Averaging per-chunk means: ratings are not weighted by count");
        }

        let rating_stats = process_chunks(
            ratings,
            config.expected_rating_chunks,
            &RatingAggregator::new(config.mean_mode),
            sink,
        )?;
        let tags = process_chunks(
            genome,
            config.expected_genome_chunks,
            &GenomeAggregator::new(config.top_tags),
            sink,
        )?;
        let movies = process_chunks(
            movies,
            config.expected_movie_chunks,
            &MovieAggregator::new(config.year_pattern),
            sink,
        )?;

        let summary = write_documents(movies, rating_stats, tags, store)?;
        store.flush()?;

        if summary.orphan_rating_keys > 0 || summary.orphan_genome_keys > 0 {
            warn!(
                "Skipped {} rated and {} tagged movie ids missing from movies.csv",
                summary.orphan_rating_keys, summary.orphan_genome_keys
            );
        }
        info!(
            "Wrote {} documents to {} ({} rated, {} tagged)",
            summary.movies_written,
            store.name(),
            summary.rated_movies,
            summary.tagged_movies
        );
        Ok(summary)
    }
}

/// Join the three datasets on movie id and upsert one document per movie.
///
/// Movies drive the join: ratings and tags for ids not in `movies` are only
/// counted.
pub fn write_documents(
    movies: Vec<Movie>,
    mut ratings: BTreeMap<MovieId, RatingStat>,
    mut tags: BTreeMap<MovieId, BTreeMap<TagId, f32>>,
    store: &mut dyn DocumentStore,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();
    for movie in movies {
        let stat = ratings.remove(&movie.id);
        let movie_tags = tags.remove(&movie.id).unwrap_or_default();
        let doc = build_document(movie, stat, movie_tags);

        if doc.rating.is_some() {
            summary.rated_movies += 1;
        }
        if !doc.tags.is_empty() {
            summary.tagged_movies += 1;
        }
        store.upsert(doc)?;
        summary.movies_written += 1;
    }
    summary.orphan_rating_keys = ratings.len();
    summary.orphan_genome_keys = tags.len();
    Ok(summary)
}

pub fn build_document(
    movie: Movie,
    stat: Option<RatingStat>,
    tags: BTreeMap<TagId, f32>,
) -> MovieDocument {
    MovieDocument {
        movie_id: movie.id,
        title: movie.title,
        genres: movie.genres,
        year: movie.year,
        rating: stat.map(|s| s.mean as f32),
        rating_count: stat.map(|s| s.count).unwrap_or(0),
        tags,
    }
}
