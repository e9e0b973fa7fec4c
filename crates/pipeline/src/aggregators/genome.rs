//! Strongest genome tags per movie.
//!
//! A tag id and its relevance always travel together as a [`TagScore`];
//! ranking looks at relevance only, so a merged entry can never pair one
//! chunk's tag with another chunk's relevance.

use crate::traits::ChunkAggregator;
use data_loader::{GenomeScore, MovieId, TagId};
use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Number of tags kept per movie by default
pub const DEFAULT_TOP_TAGS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagScore {
    pub tag_id: TagId,
    pub relevance: f32,
}

/// Aggregates `genome-scores.csv` into the `top_n` most relevant tags per movie
#[derive(Debug, Clone)]
pub struct GenomeAggregator {
    top_n: usize,
}

impl GenomeAggregator {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Dedupe by tag (max relevance, first position), then keep the best `top_n`.
    ///
    /// The sort is stable: among equal relevances, earlier entries win.
    fn top_tags(&self, scores: Vec<TagScore>) -> Vec<TagScore> {
        let mut seen: HashMap<TagId, usize> = HashMap::with_capacity(scores.len());
        let mut unique: Vec<TagScore> = Vec::with_capacity(scores.len());
        for score in scores {
            match seen.get(&score.tag_id) {
                Some(&idx) => {
                    if score.relevance > unique[idx].relevance {
                        unique[idx].relevance = score.relevance;
                    }
                }
                None => {
                    seen.insert(score.tag_id, unique.len());
                    unique.push(score);
                }
            }
        }
        unique.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(Ordering::Equal)
        });
        unique.truncate(self.top_n);
        unique
    }
}

impl Default for GenomeAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_TAGS)
    }
}

impl ChunkAggregator for GenomeAggregator {
    type Record = GenomeScore;
    type Partial = BTreeMap<MovieId, Vec<TagScore>>;
    type Output = BTreeMap<MovieId, BTreeMap<TagId, f32>>;

    fn name(&self) -> &str {
        "genome"
    }

    fn transform(&self, chunk: &[GenomeScore]) -> Self::Partial {
        let mut grouped: BTreeMap<MovieId, Vec<TagScore>> = BTreeMap::new();
        for row in chunk {
            grouped.entry(row.movie_id).or_default().push(TagScore {
                tag_id: row.tag_id,
                relevance: row.relevance,
            });
        }
        grouped
            .into_iter()
            .map(|(movie_id, scores)| (movie_id, self.top_tags(scores)))
            .collect()
    }

    fn merge(&self, mut acc: Self::Partial, partial: Self::Partial) -> Self::Partial {
        for (movie_id, scores) in partial {
            match acc.entry(movie_id) {
                Entry::Occupied(mut e) => {
                    let mut combined = std::mem::take(e.get_mut());
                    combined.extend(scores);
                    e.insert(self.top_tags(combined));
                }
                Entry::Vacant(e) => {
                    e.insert(scores);
                }
            }
        }
        acc
    }

    fn finish(&self, acc: Self::Partial) -> Self::Output {
        acc.into_iter()
            .map(|(movie_id, scores)| {
                let tags = scores.into_iter().map(|s| (s.tag_id, s.relevance)).collect();
                (movie_id, tags)
            })
            .collect()
    }

    fn partial_len(&self, partial: &Self::Partial) -> usize {
        partial.len()
    }
}
