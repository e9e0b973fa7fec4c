//! Mean rating per movie.
//!
//! Each chunk is reduced to a `(mean, count)` pair per movie, and pairs are
//! folded into the accumulator with an explicit outer join over movie ids.

use crate::traits::ChunkAggregator;
use data_loader::{MovieId, Rating};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// How two means for the same movie are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeanMode {
    /// Count-weighted: the exact mean of every rating seen so far
    #[default]
    Weighted,
    /// `(acc + chunk) / 2`, ignoring how many ratings each side holds.
    ///
    /// Matches what the legacy preprocessing step produced. Only
    /// exact when every chunk holds the same number of ratings per movie.
    ChunkMean,
}

/// Running mean rating of one movie
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStat {
    pub mean: f64,
    /// Ratings folded into `mean`
    pub count: u64,
}

impl RatingStat {
    /// Combine two stats for the same movie
    pub fn combine(self, other: RatingStat, mode: MeanMode) -> RatingStat {
        let count = self.count + other.count;
        let mean = match mode {
            MeanMode::Weighted if count > 0 => {
                (self.mean * self.count as f64 + other.mean * other.count as f64) / count as f64
            }
            MeanMode::Weighted => 0.0,
            MeanMode::ChunkMean => (self.mean + other.mean) / 2.0,
        };
        RatingStat { mean, count }
    }
}

/// Aggregates `ratings.csv` into a mean rating per movie
#[derive(Debug, Clone, Default)]
pub struct RatingAggregator {
    mode: MeanMode,
}

impl RatingAggregator {
    pub fn new(mode: MeanMode) -> Self {
        Self { mode }
    }
}

impl ChunkAggregator for RatingAggregator {
    type Record = Rating;
    type Partial = BTreeMap<MovieId, RatingStat>;
    type Output = BTreeMap<MovieId, RatingStat>;

    fn name(&self) -> &str {
        "ratings"
    }

    fn transform(&self, chunk: &[Rating]) -> Self::Partial {
        let mut sums: BTreeMap<MovieId, (f64, u64)> = BTreeMap::new();
        for rating in chunk {
            let entry = sums.entry(rating.movie_id).or_insert((0.0, 0));
            entry.0 += f64::from(rating.rating);
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(movie_id, (sum, count))| {
                (
                    movie_id,
                    RatingStat {
                        mean: sum / count as f64,
                        count,
                    },
                )
            })
            .collect()
    }

    fn merge(&self, mut acc: Self::Partial, partial: Self::Partial) -> Self::Partial {
        for (movie_id, stat) in partial {
            match acc.entry(movie_id) {
                Entry::Occupied(mut e) => {
                    let merged = e.get().combine(stat, self.mode);
                    e.insert(merged);
                }
                Entry::Vacant(e) => {
                    e.insert(stat);
                }
            }
        }
        acc
    }

    fn finish(&self, acc: Self::Partial) -> Self::Output {
        acc
    }

    fn partial_len(&self, partial: &Self::Partial) -> usize {
        partial.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user_id: u32, movie_id: MovieId, rating: f32) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating,
            timestamp: 0,
        }
    }

    fn run(ratings: &[Rating], chunk_size: usize, mode: MeanMode) -> BTreeMap<MovieId, RatingStat> {
        let agg = RatingAggregator::new(mode);
        let mut acc: Option<BTreeMap<MovieId, RatingStat>> = None;
        for chunk in ratings.chunks(chunk_size) {
            let partial = agg.transform(chunk);
            acc = Some(match acc {
                None => partial,
                Some(acc) => agg.merge(acc, partial),
            });
        }
        agg.finish(acc.unwrap_or_default())
    }

    #[test]
    fn test_single_chunk_means() {
        let ratings = [rating(1, 10, 4.0), rating(2, 10, 5.0), rating(1, 20, 3.0)];
        let out = run(&ratings, 3, MeanMode::Weighted);
        assert_eq!(out.len(), 2);
        assert_eq!(out[&10].mean as f32, 4.5);
        assert_eq!(out[&10].count, 2);
        assert_eq!(out[&20].mean as f32, 3.0);
    }

    #[test]
    fn test_weighted_is_chunk_size_independent() {
        let ratings: Vec<Rating> = (0..37)
            .map(|i| rating(i, 1 + i % 4, 0.5 + (i % 10) as f32 * 0.5))
            .collect();
        let whole = run(&ratings, ratings.len(), MeanMode::Weighted);
        for chunk_size in [1, 2, 3, 5, 8, 13] {
            let chunked = run(&ratings, chunk_size, MeanMode::Weighted);
            assert_eq!(chunked.len(), whole.len());
            for (movie_id, stat) in &whole {
                let got = chunked[movie_id];
                assert!((got.mean - stat.mean).abs() < 1e-9, "chunk size {}", chunk_size);
                assert_eq!(got.count, stat.count);
            }
        }
    }

    #[test]
    fn test_chunk_mean_formula() {
        let ratings = [rating(1, 10, 1.0), rating(2, 10, 2.0), rating(3, 10, 5.0)];

        // Chunks [1.0, 2.0] and [5.0]: ((1.0 + 2.0) / 2 + 5.0) / 2
        let out = run(&ratings, 2, MeanMode::ChunkMean);
        assert!((out[&10].mean - 3.25).abs() < 1e-12);
        assert_eq!(out[&10].count, 3);

        // One chunk holds every rating: plain mean
        let out = run(&ratings, 3, MeanMode::ChunkMean);
        assert!((out[&10].mean - 8.0 / 3.0).abs() < 1e-12);

        // Weighted gives the true mean either way
        let out = run(&ratings, 2, MeanMode::Weighted);
        assert!((out[&10].mean - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_one_sided_keys_survive() {
        let agg = RatingAggregator::default();
        let first = agg.transform(&[rating(1, 10, 4.0)]);
        let second = agg.transform(&[rating(1, 20, 2.0)]);
        let merged = agg.merge(first, second);

        assert_eq!(merged.keys().copied().collect::<Vec<_>>(), vec![10, 20]);
        assert_eq!(merged[&10].mean, 4.0);
        assert_eq!(merged[&20].mean, 2.0);
    }

    #[test]
    fn test_transform_is_pure() {
        let agg = RatingAggregator::default();
        let chunk = [rating(1, 10, 4.0), rating(2, 10, 3.5), rating(3, 11, 1.0)];
        assert_eq!(agg.transform(&chunk), agg.transform(&chunk));
    }
}
