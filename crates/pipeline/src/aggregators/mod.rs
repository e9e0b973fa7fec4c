//! The three dataset-specific aggregators.
//!
//! - `RatingAggregator`: mean rating per movie
//! - `GenomeAggregator`: strongest genome tags per movie
//! - `MovieAggregator`: parsed metadata, concatenated

pub mod genome;
pub mod movies;
pub mod rating;

pub use genome::{GenomeAggregator, TagScore};
pub use movies::MovieAggregator;
pub use rating::{MeanMode, RatingAggregator, RatingStat};
