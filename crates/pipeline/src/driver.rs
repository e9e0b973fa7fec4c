//! The streaming driver: pull chunks, transform, fold, report progress.

use crate::error::Result;
use crate::progress::{ProgressWatermark, StatusSink};
use crate::traits::ChunkAggregator;
use data_loader::DataLoadError;
use std::time::Instant;
use tracing::{debug, info};

/// Run `aggregator` over every chunk of `chunks`, in order.
///
/// ## Algorithm
/// 1. The first chunk's partial becomes the accumulator (no merge call)
/// 2. Every later chunk: `acc = merge(acc, transform(chunk))`
/// 3. After each chunk, emit the progress ticks that are due
/// 4. Return `finish(acc)`; an empty stream finishes the empty accumulator
///
/// The first error from the stream aborts the run; nothing is returned for
/// the chunks processed before it.
///
/// # Arguments
/// * `chunks` - Record stream, one `Vec` per chunk
/// * `expected_chunks` - Estimate used only for progress granularity
/// * `aggregator` - Transform/merge/finish for this dataset
/// * `sink` - Receives progress ticks
pub fn process_chunks<A, I>(
    chunks: I,
    expected_chunks: usize,
    aggregator: &A,
    sink: &mut dyn StatusSink,
) -> Result<A::Output>
where
    A: ChunkAggregator,
    I: IntoIterator<Item = std::result::Result<Vec<A::Record>, DataLoadError>>,
{
    let start = Instant::now();
    let mut watermark = ProgressWatermark::new(expected_chunks);
    let mut acc: Option<A::Partial> = None;
    let mut rows = 0usize;

    sink.begin(aggregator.name(), expected_chunks);
    for chunk in chunks {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                sink.finish();
                return Err(e.into());
            }
        };
        rows += chunk.len();

        let partial = aggregator.transform(&chunk);
        debug!(
            "{}: chunk {} ({} rows -> {} keys)",
            aggregator.name(),
            watermark.processed() + 1,
            chunk.len(),
            aggregator.partial_len(&partial)
        );
        acc = Some(match acc {
            None => partial,
            Some(acc) => aggregator.merge(acc, partial),
        });

        for _ in 0..watermark.record_chunk() {
            sink.tick();
        }
    }
    sink.finish();

    let acc = acc.unwrap_or_default();
    if watermark.processed() != watermark.expected() {
        debug!(
            "{}: expected {} chunks, processed {}",
            aggregator.name(),
            watermark.expected(),
            watermark.processed()
        );
    }
    info!(
        "{}: {} rows in {} chunks folded into {} keys in {:?}",
        aggregator.name(),
        rows,
        watermark.processed(),
        aggregator.partial_len(&acc),
        start.elapsed()
    );
    Ok(aggregator.finish(acc))
}
