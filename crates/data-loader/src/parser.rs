//! Parsing of movie metadata out of `movies.csv` rows.
//!
//! - title: "Toy Story (1995)" carries the release year in parentheses
//! - genres: pipe-separated, with "(no genres listed)" as the empty sentinel

use crate::types::*;

/// Sentinel used by MovieLens for movies without any genre
pub const NO_GENRES: &str = "(no genres listed)";

/// Turn a raw `movies.csv` row into a [`Movie`]
pub fn parse_movie(record: &MovieRecord, pattern: YearPattern) -> Movie {
    Movie {
        id: record.movie_id,
        title: strip_parenthesized(&record.title),
        year: extract_year_from_title(&record.title, pattern),
        genres: parse_genres(&record.genres),
    }
}

/// Extract the release year from a movie title, 0 when there is none
///
/// Example: "Toy Story (1995)" -> 1995
///          "Movie Title" -> 0
pub fn extract_year_from_title(title: &str, pattern: YearPattern) -> u16 {
    let year = match pattern {
        YearPattern::Strict => strict_year(title),
        YearPattern::Legacy => legacy_year(title),
    };
    year.unwrap_or(0)
}

fn strict_year(title: &str) -> Option<u16> {
    let trimmed = title.trim_end();
    let inner = trimmed.strip_suffix(')')?;
    let start = inner.rfind('(')?;
    let year_str = &inner[start + 1..];
    if year_str.len() != 4 || !year_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year_str.parse().ok()
}

fn legacy_year(title: &str) -> Option<u16> {
    let start = title.find('(')?;
    let end = title.rfind(')')?;
    if start >= end {
        return None;
    }
    let year_str = &title[start + 1..end];
    if year_str.is_empty() || !year_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year_str.parse().ok()
}

/// Remove every "(...)" group from a title, leaving the rest verbatim
///
/// Groups match lazily: an opening parenthesis pairs with the next closing
/// one. An opening parenthesis with no closing partner is kept as text.
pub fn strip_parenthesized(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut rest = title;
    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Parse pipe-separated genres
///
/// Example: "Action|Adventure|Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
///          "(no genres listed)" -> []
pub fn parse_genres(s: &str) -> Vec<String> {
    if s.trim() == NO_GENRES {
        return Vec::new();
    }
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year_from_title("Toy Story (1995)", YearPattern::Strict), 1995);
        assert_eq!(extract_year_from_title("Movie Title", YearPattern::Strict), 0);
        assert_eq!(extract_year_from_title("Babylon 5 (1994) ", YearPattern::Strict), 1994);
    }

    #[test]
    fn test_strict_year_uses_last_group() {
        let title = "City of Lost Children, The (Cité des enfants perdus, La) (1995)";
        assert_eq!(extract_year_from_title(title, YearPattern::Strict), 1995);
        assert_eq!(extract_year_from_title(title, YearPattern::Legacy), 0);
    }

    #[test]
    fn test_strict_year_rejects_non_years() {
        assert_eq!(extract_year_from_title("Ranges (2006-2007)", YearPattern::Strict), 0);
        assert_eq!(extract_year_from_title("Short (95)", YearPattern::Strict), 0);
        assert_eq!(extract_year_from_title("(1995) Prefix only", YearPattern::Strict), 0);
    }

    #[test]
    fn test_legacy_year() {
        assert_eq!(extract_year_from_title("Toy Story (1995)", YearPattern::Legacy), 1995);
        assert_eq!(extract_year_from_title("Short (95)", YearPattern::Legacy), 95);
        assert_eq!(extract_year_from_title("Unknown", YearPattern::Legacy), 0);
        assert_eq!(extract_year_from_title(") odd (", YearPattern::Legacy), 0);
    }

    #[test]
    fn test_strip_parenthesized() {
        assert_eq!(strip_parenthesized("Toy Story (1995)"), "Toy Story ");
        assert_eq!(strip_parenthesized("A (b) C (1999)"), "A  C ");
        assert_eq!(strip_parenthesized("Unknown"), "Unknown");
        assert_eq!(strip_parenthesized("Open (ended"), "Open (ended");
    }

    #[test]
    fn test_parse_genres() {
        assert_eq!(
            parse_genres("Adventure|Animation|Children"),
            vec!["Adventure", "Animation", "Children"]
        );
        assert!(parse_genres(NO_GENRES).is_empty());
        assert!(parse_genres("").is_empty());
    }

    #[test]
    fn test_parse_movie() {
        let unknown = MovieRecord {
            movie_id: 7,
            title: "Unknown".to_string(),
            genres: "(no genres listed)".to_string(),
        };
        let movie = parse_movie(&unknown, YearPattern::Strict);
        assert_eq!(movie.id, 7);
        assert_eq!(movie.year, 0);
        assert!(movie.genres.is_empty());
    }
}
