use super::{QueryBackend, QueryDocument};
use crate::error::{GrepsError, Result};
use std::cell::RefCell;

/// In-memory query backend for testing.
///
/// Uses `RefCell` so the trait can take `&self`, like the filesystem backend.
#[derive(Default)]
pub struct MemQueryBackend {
    doc: RefCell<Option<QueryDocument>>,
    simulate_write_error: RefCell<bool>,
}

impl MemQueryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: QueryDocument) -> Self {
        Self {
            doc: RefCell::new(Some(doc)),
            simulate_write_error: RefCell::new(false),
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// The stored document, if anything was ever saved.
    pub fn snapshot(&self) -> Option<QueryDocument> {
        self.doc.borrow().clone()
    }
}

impl QueryBackend for MemQueryBackend {
    fn load(&self) -> Result<QueryDocument> {
        Ok(self.doc.borrow().clone().unwrap_or_default())
    }

    fn save(&self, doc: &QueryDocument) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(GrepsError::Api("Simulated write error".to_string()));
        }
        *self.doc.borrow_mut() = Some(doc.clone());
        Ok(())
    }

    fn ensure_exists(&self) -> Result<bool> {
        if self.doc.borrow().is_some() {
            return Ok(false);
        }
        self.save(&QueryDocument::new())?;
        Ok(true)
    }
}
