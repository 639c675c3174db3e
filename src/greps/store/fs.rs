use super::{QueryBackend, QueryDocument};
use crate::error::{GrepsError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub const QUERIES_FILENAME: &str = "queries.json";

pub struct FsQueryBackend {
    root: PathBuf,
}

impl FsQueryBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(QUERIES_FILENAME)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(GrepsError::Io)?;
        }
        Ok(())
    }
}

impl QueryBackend for FsQueryBackend {
    fn load(&self) -> Result<QueryDocument> {
        let path = self.path();
        if !path.exists() {
            return Ok(QueryDocument::new());
        }
        let content = fs::read_to_string(&path).map_err(GrepsError::Io)?;
        if content.trim().is_empty() {
            return Ok(QueryDocument::new());
        }
        match serde_json::from_str::<Value>(&content).map_err(GrepsError::Serialization)? {
            Value::Object(doc) => Ok(doc),
            _ => Err(GrepsError::Api(format!(
                "{} does not hold a JSON object",
                path.display()
            ))),
        }
    }

    fn save(&self, doc: &QueryDocument) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content = serde_json::to_string_pretty(doc).map_err(GrepsError::Serialization)?;

        // Atomic write
        let tmp = self.root.join(format!(".queries-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, content).map_err(GrepsError::Io)?;
        fs::rename(&tmp, self.path()).map_err(GrepsError::Io)?;
        debug!(entries = doc.len(), "saved query document");
        Ok(())
    }

    fn ensure_exists(&self) -> Result<bool> {
        if self.path().exists() {
            return Ok(false);
        }
        self.save(&QueryDocument::new())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let backend = FsQueryBackend::new(dir.path().join("data"));
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn ensure_exists_creates_an_empty_object_once() {
        let dir = TempDir::new().unwrap();
        let backend = FsQueryBackend::new(dir.path().join("data"));

        assert!(backend.ensure_exists().unwrap());
        assert!(!backend.ensure_exists().unwrap());
        let content = fs::read_to_string(backend.path()).unwrap();
        assert_eq!(content.trim(), "{}");
    }

    #[test]
    fn save_then_load_keeps_key_order() {
        let dir = TempDir::new().unwrap();
        let backend = FsQueryBackend::new(dir.path());
        let mut doc = QueryDocument::new();
        doc.insert("zeta".into(), json!(["z", "Z"]));
        doc.insert("alpha".into(), json!(["a", "A"]));
        backend.save(&doc).unwrap();

        let keys: Vec<String> = backend.load().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn corrupt_documents_are_errors() {
        let dir = TempDir::new().unwrap();
        let backend = FsQueryBackend::new(dir.path());
        fs::write(backend.path(), "{not json").unwrap();
        assert!(matches!(backend.load(), Err(GrepsError::Serialization(_))));

        fs::write(backend.path(), "[1, 2]").unwrap();
        assert!(matches!(backend.load(), Err(GrepsError::Api(_))));
    }
}
