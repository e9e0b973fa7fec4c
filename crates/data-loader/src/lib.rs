//! # Data Loader Crate
//!
//! This crate reads the MovieLens 25M CSV files as chunked record streams.
//!
//! ## Main Components
//!
//! - **types**: Row types (Rating, MovieRecord, GenomeScore, GenomeTag) and parsed Movie
//! - **reader**: `ChunkedReader`, a forward-only iterator of fixed-size row chunks
//! - **parser**: Title/year/genre parsing for `movies.csv`
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{ChunkedReader, Rating};
//! use std::path::Path;
//!
//! let chunks = ChunkedReader::<Rating>::open(Path::new("data/ml-25m/ratings.csv"), 50_000)?;
//! for chunk in chunks {
//!     let chunk = chunk?;
//!     println!("{} rows", chunk.len());
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod reader;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use reader::{ChunkedReader, DEFAULT_CHUNK_SIZE, load_genome_tags, read_all};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    TagId,
    // Row types
    Rating,
    MovieRecord,
    GenomeScore,
    GenomeTag,
    CsvRecord,
    // Parsed types
    Movie,
    YearPattern,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movies_stream_parses() {
        let data = "movieId,title,genres\n\
            1,Toy Story (1995),Adventure|Animation|Children\n\
            2,\"American President, The (1995)\",Comedy|Drama|Romance\n";
        let chunk = ChunkedReader::<MovieRecord, _>::from_reader("movies.csv", data.as_bytes(), 10)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();

        let movies: Vec<Movie> = chunk
            .iter()
            .map(|r| parser::parse_movie(r, YearPattern::Strict))
            .collect();
        assert_eq!(movies[0].title, "Toy Story ");
        assert_eq!(movies[0].year, 1995);
        assert_eq!(movies[1].title, "American President, The ");
        assert_eq!(movies[1].genres.len(), 3);
    }

    #[test]
    fn test_genome_scores_stream_parses() {
        let data = "movieId,tagId,relevance\n1,1,0.02875\n1,2,0.02375\n";
        let rows: Vec<GenomeScore> =
            ChunkedReader::<GenomeScore, _>::from_reader("genome-scores.csv", data.as_bytes(), 10)
                .unwrap()
                .flat_map(|c| c.unwrap())
                .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].tag_id, 2);
    }
}
