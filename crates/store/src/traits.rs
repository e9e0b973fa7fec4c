//! The narrow interface the pipeline writes to and the CLI reads from.

use crate::document::{MovieDocument, SortField};
use crate::error::Result;
use data_loader::MovieId;

/// A key-value document store, one document per movie id.
///
/// Writes are single-document upserts; there is no batching or transaction.
pub trait DocumentStore {
    /// Returns the name of this store (for logging)
    fn name(&self) -> &str;

    /// Insert or replace the document for `doc.movie_id`
    fn upsert(&mut self, doc: MovieDocument) -> Result<()>;

    /// Look up one document
    fn get(&self, movie_id: MovieId) -> Option<&MovieDocument>;

    /// Up to `limit` documents ordered by `field`, descending
    fn top_by(&self, field: SortField, limit: usize) -> Result<Vec<MovieDocument>>;

    /// Number of distinct documents
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every accepted write durable
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
