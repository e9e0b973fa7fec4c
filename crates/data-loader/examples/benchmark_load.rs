use data_loader::{ChunkedReader, DEFAULT_CHUNK_SIZE, Rating};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("data/ml-25m/ratings.csv");

    println!("Streaming {} in chunks of {}...\n", path.display(), DEFAULT_CHUNK_SIZE);

    let start = Instant::now();
    let reader = ChunkedReader::<Rating>::open(path, DEFAULT_CHUNK_SIZE)
        .expect("Failed to open ratings file");

    let mut chunks = 0usize;
    let mut rows = 0usize;
    let mut movies = HashSet::new();
    for chunk in reader {
        let chunk = chunk.expect("Failed to read chunk");
        chunks += 1;
        rows += chunk.len();
        movies.extend(chunk.iter().map(|r| r.movie_id));
    }
    let elapsed = start.elapsed();

    println!("\n=== Stream Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Chunks: {}", chunks);
    println!("Ratings: {}", rows);
    println!("Distinct movies: {}", movies.len());
    println!("\nPerformance: {:.0} ratings/second",
             rows as f64 / elapsed.as_secs_f64());
}
