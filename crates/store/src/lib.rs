//! # Store Crate
//!
//! The document store the ingest pipeline upserts into, and the
//! "top N by field" query the CLI reads back.
//!
//! - **document**: `MovieDocument` and ranking by a numeric field
//! - **traits**: the `DocumentStore` interface
//! - **memory**: `MemoryStore`, a `BTreeMap`-backed store
//! - **jsonl**: `JsonLinesStore`, an append-only JSON-lines file

pub mod document;
pub mod error;
pub mod jsonl;
pub mod memory;
pub mod traits;

pub use document::{MovieDocument, SortField, rank_documents};
pub use error::{Result, StoreError};
pub use jsonl::JsonLinesStore;
pub use memory::MemoryStore;
pub use traits::DocumentStore;
