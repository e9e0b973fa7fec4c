//! Chunked CSV record streams.
//!
//! A [`ChunkedReader`] pulls at most `chunk_size` typed rows at a time from
//! one CSV file, so arbitrarily large files are processed in bounded memory.
//! The stream is forward-only: once exhausted (or after the first error) it
//! yields nothing more.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;
use tracing::debug;

/// Default number of rows per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 50_000;

/// Iterator over fixed-size chunks of typed CSV rows
pub struct ChunkedReader<T, R = File> {
    file: String,
    reader: csv::Reader<R>,
    record: csv::StringRecord,
    headers: csv::StringRecord,
    chunk_size: usize,
    rows_read: u64,
    done: bool,
    _marker: PhantomData<T>,
}

impl<T: CsvRecord> ChunkedReader<T, File> {
    /// Open a CSV file for chunked reading.
    ///
    /// Fails with `SourceUnavailable` if the file cannot be opened and with
    /// `MissingColumn` if its header lacks a required column. A `chunk_size`
    /// of 0 is treated as 1.
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self> {
        let file = File::open(path).map_err(|source| DataLoadError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Opened {} for chunked reading (chunk size {})", label, chunk_size);
        Self::from_reader(label, file, chunk_size)
    }
}

impl<T: CsvRecord, R: Read> ChunkedReader<T, R> {
    /// Wrap any byte source. `file` is only used to label errors.
    pub fn from_reader(file: impl Into<String>, source: R, chunk_size: usize) -> Result<Self> {
        let file = file.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(source);

        let headers = reader
            .headers()
            .map_err(|e| DataLoadError::from_csv(&file, e))?
            .clone();
        for column in T::REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                return Err(DataLoadError::MissingColumn {
                    file,
                    column: column.to_string(),
                });
            }
        }

        Ok(Self {
            file,
            reader,
            record: csv::StringRecord::new(),
            headers,
            chunk_size: chunk_size.max(1),
            rows_read: 0,
            done: false,
            _marker: PhantomData,
        })
    }

    /// Number of data rows read so far
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Name used for this stream in errors and logs
    pub fn file(&self) -> &str {
        &self.file
    }

    fn malformed(&self, reason: String) -> DataLoadError {
        DataLoadError::MalformedRecord {
            file: self.file.clone(),
            line: self.record.position().map(|p| p.line()).unwrap_or(0),
            reason,
        }
    }

    fn next_chunk(&mut self) -> Result<Vec<T>> {
        let mut chunk = Vec::with_capacity(self.chunk_size.min(DEFAULT_CHUNK_SIZE));
        while chunk.len() < self.chunk_size {
            let more = self
                .reader
                .read_record(&mut self.record)
                .map_err(|e| DataLoadError::from_csv(&self.file, e))?;
            if !more {
                self.done = true;
                break;
            }
            let row: T = self
                .record
                .deserialize(Some(&self.headers))
                .map_err(|e| self.malformed(e.to_string()))?;
            row.validate().map_err(|reason| self.malformed(reason))?;
            self.rows_read += 1;
            chunk.push(row);
        }
        Ok(chunk)
    }
}

impl<T: CsvRecord, R: Read> Iterator for ChunkedReader<T, R> {
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_chunk() {
            Ok(chunk) if chunk.is_empty() => None,
            Ok(chunk) => Some(Ok(chunk)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Read a small file whole, as a single chunk
pub fn read_all<T: CsvRecord>(path: &Path) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for chunk in ChunkedReader::<T>::open(path, usize::MAX)? {
        rows.extend(chunk?);
    }
    Ok(rows)
}

/// Load `genome-tags.csv` into a tag id -> tag name lookup
pub fn load_genome_tags(path: &Path) -> Result<BTreeMap<TagId, String>> {
    let tags = read_all::<GenomeTag>(path)?
        .into_iter()
        .map(|t| (t.tag_id, t.tag))
        .collect();
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATINGS: &str = "userId,movieId,rating,timestamp\n\
        1,10,4.0,1000\n\
        2,10,5.0,1001\n\
        1,20,3.0,1002\n\
        3,30,2.5,1003\n\
        4,30,3.5,1004\n";

    fn reader(data: &'static str, chunk_size: usize) -> ChunkedReader<Rating, &'static [u8]> {
        ChunkedReader::from_reader("ratings.csv", data.as_bytes(), chunk_size).unwrap()
    }

    #[test]
    fn test_chunk_sizes() {
        let sizes: Vec<usize> = reader(RATINGS, 2).map(|c| c.unwrap().len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let data = "userId,movieId,rating,timestamp\n1,10,4.0,1\n2,10,5.0,2\n";
        let sizes: Vec<usize> = reader(data, 2).map(|c| c.unwrap().len()).collect();
        assert_eq!(sizes, vec![2]);
    }

    #[test]
    fn test_empty_file_yields_no_chunks() {
        let mut r = reader("userId,movieId,rating,timestamp\n", 10);
        assert!(r.next().is_none());
        assert_eq!(r.rows_read(), 0);
    }

    #[test]
    fn test_columns_bound_by_name() {
        let data = "movieId,rating,timestamp,userId\n10,4.5,99,7\n";
        let rows: Vec<Rating> = reader(data, 10).next().unwrap().unwrap();
        assert_eq!(
            rows[0],
            Rating {
                user_id: 7,
                movie_id: 10,
                rating: 4.5,
                timestamp: 99
            }
        );
    }

    #[test]
    fn test_missing_column() {
        let result = ChunkedReader::<Rating, _>::from_reader(
            "ratings.csv",
            "userId,movieId,timestamp\n1,2,3\n".as_bytes(),
            10,
        );
        match result {
            Err(DataLoadError::MissingColumn { column, .. }) => assert_eq!(column, "rating"),
            other => panic!("expected MissingColumn, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_padded_header_names_bind() {
        let data = "userId, movieId, rating, timestamp\n1,10,4.0,1\n";
        let rows: Vec<Rating> = reader(data, 10).next().unwrap().unwrap();
        assert_eq!(rows[0].movie_id, 10);
        assert_eq!(rows[0].rating, 4.0);
    }

    #[test]
    fn test_padded_header_missing_column() {
        let result = ChunkedReader::<Rating, _>::from_reader(
            "ratings.csv",
            "userId , movieId ,timestamp\n1,2,3\n".as_bytes(),
            10,
        );
        assert!(matches!(
            result.err(),
            Some(DataLoadError::MissingColumn { ref column, .. }) if column == "rating"
        ));
    }

    #[test]
    fn test_malformed_row_stops_stream() {
        let data = "userId,movieId,rating,timestamp\n1,10,4.0,1\n1,abc,4.0,2\n1,30,4.0,3\n";
        let mut r = reader(data, 1);
        assert!(r.next().unwrap().is_ok());
        match r.next().unwrap() {
            Err(DataLoadError::MalformedRecord { file, line, .. }) => {
                assert_eq!(file, "ratings.csv");
                assert_eq!(line, 3);
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
        assert!(r.next().is_none());
    }

    #[test]
    fn test_non_finite_rating_rejected() {
        let data = "userId,movieId,rating,timestamp\n1,10,NaN,1\n";
        let err = reader(data, 10).next().unwrap().unwrap_err();
        match err {
            DataLoadError::MalformedRecord { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("rating"));
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_field_count() {
        let data = "userId,movieId,rating,timestamp\n1,10,4.0\n";
        let err = reader(data, 10).next().unwrap().unwrap_err();
        assert!(matches!(err, DataLoadError::MalformedRecord { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ChunkedReader::<Rating>::open(Path::new("/nonexistent/ratings.csv"), 10)
            .err()
            .unwrap();
        assert!(matches!(err, DataLoadError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_load_genome_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genome-tags.csv");
        std::fs::write(&path, "tagId,tag\n1,007\n2,\"action, packed\"\n").unwrap();

        let tags = load_genome_tags(&path).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[&2], "action, packed");
    }
}
