//! Movie metadata: parse each row, concatenate chunks. No key-based folding.

use crate::traits::ChunkAggregator;
use data_loader::parser::parse_movie;
use data_loader::{Movie, MovieRecord, YearPattern};

#[derive(Debug, Clone, Default)]
pub struct MovieAggregator {
    year_pattern: YearPattern,
}

impl MovieAggregator {
    pub fn new(year_pattern: YearPattern) -> Self {
        Self { year_pattern }
    }
}

impl ChunkAggregator for MovieAggregator {
    type Record = MovieRecord;
    type Partial = Vec<Movie>;
    type Output = Vec<Movie>;

    fn name(&self) -> &str {
        "movies"
    }

    fn transform(&self, chunk: &[MovieRecord]) -> Vec<Movie> {
        chunk
            .iter()
            .map(|record| parse_movie(record, self.year_pattern))
            .collect()
    }

    fn merge(&self, mut acc: Vec<Movie>, partial: Vec<Movie>) -> Vec<Movie> {
        acc.extend(partial);
        acc
    }

    fn finish(&self, acc: Vec<Movie>) -> Vec<Movie> {
        acc
    }

    fn partial_len(&self, partial: &Vec<Movie>) -> usize {
        partial.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(movie_id: u32, title: &str, genres: &str) -> MovieRecord {
        MovieRecord {
            movie_id,
            title: title.to_string(),
            genres: genres.to_string(),
        }
    }

    fn records() -> Vec<MovieRecord> {
        vec![
            record(1, "Toy Story (1995)", "Adventure|Animation|Children"),
            record(2, "Jumanji (1995)", "Adventure|Children|Fantasy"),
            record(3, "Unknown", "(no genres listed)"),
            record(4, "Heat (1995)", "Action|Crime|Thriller"),
            record(5, "Strange (Days) (2001)", "Sci-Fi"),
        ]
    }

    #[test]
    fn test_toy_story_and_unknown() {
        let movies = MovieAggregator::default().transform(&records());

        assert_eq!(movies[0].title, "Toy Story ");
        assert_eq!(movies[0].year, 1995);
        assert_eq!(movies[0].genres, vec!["Adventure", "Animation", "Children"]);

        assert_eq!(movies[2].title, "Unknown");
        assert_eq!(movies[2].year, 0);
        assert!(movies[2].genres.is_empty());

        assert_eq!(movies[4].title, "Strange  ");
        assert_eq!(movies[4].year, 2001);
    }

    #[test]
    fn test_concatenation_is_chunk_size_independent() {
        let agg = MovieAggregator::default();
        let rows = records();
        let whole = agg.transform(&rows);
        for chunk_size in 1..=rows.len() {
            let mut acc: Vec<Movie> = Vec::new();
            for chunk in rows.chunks(chunk_size) {
                acc = agg.merge(acc, agg.transform(chunk));
            }
            assert_eq!(agg.finish(acc), whole);
        }
    }
}
