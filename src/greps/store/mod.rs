//! # Query document storage
//!
//! Saved queries and the two history lists live in one JSON object:
//!
//! ```text
//! {
//!   "<query name>": ["<pattern>", "<replacement>"],
//!   "_find_what_history": ["...", ...],
//!   "_change_to_history": ["...", ...]
//! }
//! ```
//!
//! A [`QueryBackend`] only loads and saves that whole object. Everything that
//! interprets it lives in [`crate::repository::QueryRepository`].
//!
//! - [`fs::FsQueryBackend`]: `queries.json` in the data directory, written atomically
//! - [`memory::MemQueryBackend`]: in-memory, for tests

use crate::error::Result;
use serde_json::{Map, Value};

pub mod fs;
pub mod memory;

/// The whole persisted query document.
pub type QueryDocument = Map<String, Value>;

/// Raw load/save of the query document.
pub trait QueryBackend {
    /// Load the document. A missing store reads as an empty object.
    fn load(&self) -> Result<QueryDocument>;

    /// Replace the stored document.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save(&self, doc: &QueryDocument) -> Result<()>;

    /// Create an empty document if none exists. Returns true if one was created.
    fn ensure_exists(&self) -> Result<bool>;
}
