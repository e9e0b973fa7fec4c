//! In-process document store.

use crate::document::{MovieDocument, SortField, rank_documents};
use crate::error::Result;
use crate::traits::DocumentStore;
use data_loader::MovieId;
use std::collections::BTreeMap;

/// Documents held in a `BTreeMap` keyed by movie id; upsert replaces.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: BTreeMap<MovieId, MovieDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate documents in movie id order
    pub fn documents(&self) -> impl Iterator<Item = &MovieDocument> {
        self.docs.values()
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn upsert(&mut self, doc: MovieDocument) -> Result<()> {
        self.docs.insert(doc.movie_id, doc);
        Ok(())
    }

    fn get(&self, movie_id: MovieId) -> Option<&MovieDocument> {
        self.docs.get(&movie_id)
    }

    fn top_by(&self, field: SortField, limit: usize) -> Result<Vec<MovieDocument>> {
        Ok(rank_documents(self.docs.values(), field, limit))
    }

    fn len(&self) -> usize {
        self.docs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(movie_id: MovieId, rating: f32) -> MovieDocument {
        MovieDocument {
            movie_id,
            title: "Test".to_string(),
            genres: vec!["Drama".to_string()],
            year: 2000,
            rating: Some(rating),
            rating_count: 1,
            tags: BTreeMap::new(),
        }
    }

    #[test]
    fn test_upsert_replaces() {
        let mut store = MemoryStore::new();
        store.upsert(doc(1, 2.0)).unwrap();
        store.upsert(doc(1, 4.0)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().rating, Some(4.0));
    }

    #[test]
    fn test_top_by_rating() {
        let mut store = MemoryStore::new();
        for (id, rating) in [(1, 3.0), (2, 5.0), (3, 4.0)] {
            store.upsert(doc(id, rating)).unwrap();
        }
        let top = store.top_by(SortField::Rating, 2).unwrap();
        assert_eq!(top.iter().map(|d| d.movie_id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.top_by(SortField::Rating, 10).unwrap().is_empty());
    }
}
