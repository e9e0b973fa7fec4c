//! The per-movie document written by the ingest pipeline.

use data_loader::{MovieId, TagId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One stored movie: metadata, mean rating and strongest genome tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDocument {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    /// Release year, 0 when unknown
    pub year: u16,
    /// Mean rating; `None` when nobody rated the movie
    pub rating: Option<f32>,
    #[serde(default)]
    pub rating_count: u64,
    /// Tag id -> relevance, at most a handful of entries
    #[serde(default)]
    pub tags: BTreeMap<TagId, f32>,
}

/// Numeric fields a store can rank documents by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Rating,
    Year,
    RatingCount,
}

impl MovieDocument {
    /// Value of `field`, or `None` when the document doesn't carry it
    pub fn sort_key(&self, field: SortField) -> Option<f64> {
        match field {
            SortField::Rating => self.rating.map(f64::from),
            SortField::Year => (self.year != 0).then_some(f64::from(self.year)),
            SortField::RatingCount => Some(self.rating_count as f64),
        }
    }
}

/// Order documents by `field` descending and keep the first `limit`.
///
/// Documents without the field go last; ties are broken by movie id.
pub fn rank_documents<'a>(
    docs: impl IntoIterator<Item = &'a MovieDocument>,
    field: SortField,
    limit: usize,
) -> Vec<MovieDocument> {
    let mut ranked: Vec<&MovieDocument> = docs.into_iter().collect();
    ranked.sort_by(|a, b| {
        let by_field = match (a.sort_key(field), b.sort_key(field)) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_field.then_with(|| a.movie_id.cmp(&b.movie_id))
    });
    ranked.into_iter().take(limit).cloned().collect()
}
