//! Core record types for the MovieLens 25M CSV files.
//!
//! Each struct maps one row of one file. Columns are bound by header name
//! (`#[serde(rename = ...)]`), so the physical column order does not matter.
//! Numeric fields are narrowed to fixed-width types at read time.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

/// Unique identifier for a genome tag (1-1128 in MovieLens 25M)
pub type TagId = u32;

// =============================================================================
// Raw rows
// =============================================================================

/// One row of `ratings.csv`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    /// Rating value, half-star steps from 0.5 to 5.0
    pub rating: f32,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

/// One row of `movies.csv`, before any title or genre parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub title: String,
    /// Pipe-separated genre list, e.g. "Adventure|Animation|Children"
    pub genres: String,
}

/// One row of `genome-scores.csv`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenomeScore {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    #[serde(rename = "tagId")]
    pub tag_id: TagId,
    pub relevance: f32,
}

/// One row of `genome-tags.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeTag {
    #[serde(rename = "tagId")]
    pub tag_id: TagId,
    pub tag: String,
}

// =============================================================================
// Parsed types
// =============================================================================

/// A movie after metadata parsing
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    /// Title with every parenthesized group removed ("Toy Story (1995)" -> "Toy Story ")
    pub title: String,
    /// Release year, 0 when the title carries none
    pub year: u16,
    /// Genre tags; empty for "(no genres listed)"
    pub genres: Vec<String>,
}

/// Which rule extracts the release year from a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearPattern {
    /// Last parenthesized group, exactly four digits, closing the title
    #[default]
    Strict,
    /// Everything between the first '(' and the last ')', all digits
    Legacy,
}

// =============================================================================
// Column requirements
// =============================================================================

/// A CSV row type that knows which header columns it needs.
///
/// Checked once when a file is opened so a missing column fails before the
/// first chunk instead of on the first row.
pub trait CsvRecord: serde::de::DeserializeOwned {
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// Reject rows that deserialize but carry unusable values
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

impl CsvRecord for Rating {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["userId", "movieId", "rating", "timestamp"];

    fn validate(&self) -> std::result::Result<(), String> {
        if !self.rating.is_finite() {
            return Err(format!("rating is not a finite number: {}", self.rating));
        }
        Ok(())
    }
}

impl CsvRecord for MovieRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["movieId", "title", "genres"];
}

impl CsvRecord for GenomeScore {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["movieId", "tagId", "relevance"];

    fn validate(&self) -> std::result::Result<(), String> {
        if !self.relevance.is_finite() {
            return Err(format!("relevance is not a finite number: {}", self.relevance));
        }
        Ok(())
    }
}

impl CsvRecord for GenomeTag {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["tagId", "tag"];
}
