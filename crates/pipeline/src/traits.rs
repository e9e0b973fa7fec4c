//! Core trait for the chunked aggregation pipeline.
//!
//! A [`ChunkAggregator`] describes one dataset: how a chunk of raw rows
//! becomes a partial aggregate, how two partials fold together, and how the
//! final accumulator becomes the output dataset.

/// Transform / merge / finish triple driven by [`crate::driver::process_chunks`].
///
/// ## Contract
/// - `transform` is pure: the same chunk always yields the same partial
/// - `merge` only ever grows the key set of the accumulator
/// - `Partial::default()` is the empty accumulator, used when the stream
///   yields no chunk at all
pub trait ChunkAggregator {
    /// Row type of the record stream
    type Record;
    /// Per-chunk aggregate, also used as the running accumulator
    type Partial: Default;
    /// Final dataset
    type Output;

    /// Returns the name of this aggregator (for logging/progress)
    fn name(&self) -> &str;

    /// Turn one chunk into a partial aggregate
    fn transform(&self, chunk: &[Self::Record]) -> Self::Partial;

    /// Fold a partial aggregate into the accumulator
    fn merge(&self, acc: Self::Partial, partial: Self::Partial) -> Self::Partial;

    /// Post-process the accumulator once the stream is exhausted
    fn finish(&self, acc: Self::Partial) -> Self::Output;

    /// Number of keys (or rows) in a partial, for logging
    fn partial_len(&self, partial: &Self::Partial) -> usize;
}
