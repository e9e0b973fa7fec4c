//! File-backed document store: one JSON document per line.
//!
//! Upserts append. On open, the file is replayed and the last line for each
//! movie id wins, so rewriting a movie never yields two logical documents.
//! [`JsonLinesStore::compact`] rewrites the file without superseded lines.

use crate::document::{MovieDocument, SortField, rank_documents};
use crate::error::{Result, StoreError};
use crate::traits::DocumentStore;
use data_loader::MovieId;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct JsonLinesStore {
    path: PathBuf,
    writer: BufWriter<File>,
    docs: BTreeMap<MovieId, MovieDocument>,
    lines_written: usize,
}

impl JsonLinesStore {
    /// Open (or create) the store file at `path` and replay its contents
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut docs = BTreeMap::new();
        let mut lines = 0;
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for (idx, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let doc: MovieDocument =
                    serde_json::from_str(&line).map_err(|e| StoreError::Corrupt {
                        line: idx + 1,
                        reason: e.to_string(),
                    })?;
                docs.insert(doc.movie_id, doc);
                lines += 1;
            }
            info!(
                "Opened store {} ({} documents, {} lines)",
                path.display(),
                docs.len(),
                lines
            );
        }

        let unterminated = path.exists() && !ends_with_newline(path)?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        if unterminated {
            debug!("Terminating last line of {}", path.display());
            writer.write_all(b"\n")?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            docs,
            lines_written: lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file so it holds exactly one line per document
    pub fn compact(&mut self) -> Result<()> {
        self.writer.flush()?;
        if self.lines_written == self.docs.len() {
            return Ok(());
        }

        let tmp_path = self.path.with_extension("jsonl.tmp");
        {
            let mut tmp = BufWriter::new(File::create(&tmp_path)?);
            for doc in self.docs.values() {
                let line = serde_json::to_string(doc).map_err(|e| StoreError::SinkWrite {
                    movie_id: doc.movie_id,
                    reason: e.to_string(),
                })?;
                writeln!(tmp, "{}", line)?;
            }
            tmp.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        self.writer = BufWriter::new(file);
        debug!(
            "Compacted {} from {} to {} lines",
            self.path.display(),
            self.lines_written,
            self.docs.len()
        );
        self.lines_written = self.docs.len();
        Ok(())
    }
}

/// True for an empty file or one whose last byte is `\n`
fn ends_with_newline(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Ratings and relevances must survive a JSON round trip unchanged.
fn check_finite(doc: &MovieDocument) -> Result<()> {
    let bad_rating = doc.rating.is_some_and(|r| !r.is_finite());
    let bad_tag = doc.tags.values().any(|r| !r.is_finite());
    if bad_rating || bad_tag {
        return Err(StoreError::SinkWrite {
            movie_id: doc.movie_id,
            reason: "non-finite rating or relevance".to_string(),
        });
    }
    Ok(())
}

impl DocumentStore for JsonLinesStore {
    fn name(&self) -> &str {
        "JsonLinesStore"
    }

    fn upsert(&mut self, doc: MovieDocument) -> Result<()> {
        check_finite(&doc)?;
        let line = serde_json::to_string(&doc).map_err(|e| StoreError::SinkWrite {
            movie_id: doc.movie_id,
            reason: e.to_string(),
        })?;
        writeln!(self.writer, "{}", line).map_err(|e| StoreError::SinkWrite {
            movie_id: doc.movie_id,
            reason: e.to_string(),
        })?;
        self.lines_written += 1;
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

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonLinesStore {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!("Failed to flush store {}: {}", self.path.display(), e);
        }
    }
}
