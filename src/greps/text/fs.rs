use super::{splice, TextStore};
use crate::error::{GrepsError, Result};
use crate::model::{ContainerId, Selection};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// A document laid out as a directory of story files.
///
/// Every regular, non-hidden file whose extension is in `extensions` is a story
/// root, ordered by file name. The handle of a story is its file name.
pub struct FileTextStore {
    root: PathBuf,
    extensions: Vec<String>,
    selection_root: Option<ContainerId>,
    selection: Option<Selection>,
}

impl FileTextStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec![".txt".to_string()],
            selection_root: None,
            selection: None,
        }
    }

    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|ext| {
                let ext = ext.to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Makes `name` the story holding the current selection.
    pub fn select_story(&mut self, name: &str) -> Result<()> {
        let id = ContainerId::new(name);
        if !self.list_story_roots()?.contains(&id) {
            return Err(GrepsError::StoreIo(format!(
                "{} is not a story in {}",
                name,
                self.root.display()
            )));
        }
        self.selection_root = Some(id);
        Ok(())
    }

    /// The range last selected by a find or replace.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn is_story(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.starts_with('.') || !path.is_file() {
            return false;
        }
        let name = name.to_lowercase();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    fn story_path(&self, container: &ContainerId) -> Result<PathBuf> {
        let name = container.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(GrepsError::StoreIo(format!("Invalid story handle: {}", name)));
        }
        Ok(self.root.join(name))
    }

    fn write_atomic(&self, container: &ContainerId, text: &str) -> Result<()> {
        let target = self.story_path(container)?;
        let tmp = self.root.join(format!(".story-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, text).map_err(|e| io_error(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(&target, e));
        }
        debug!(story = %container, bytes = text.len(), "wrote story");
        Ok(())
    }
}

fn io_error(path: &Path, e: std::io::Error) -> GrepsError {
    GrepsError::StoreIo(format!("{}: {}", path.display(), e))
}

impl TextStore for FileTextStore {
    fn list_story_roots(&self) -> Result<Vec<ContainerId>> {
        let entries = fs::read_dir(&self.root).map_err(|e| io_error(&self.root, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(&self.root, e))?.path();
            if self.is_story(&path) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names.into_iter().map(ContainerId::new).collect())
    }

    fn current_selection_root(&self) -> Result<Option<ContainerId>> {
        Ok(self.selection_root.clone())
    }

    fn get_full_text(&self, container: &ContainerId) -> Result<String> {
        let path = self.story_path(container)?;
        fs::read_to_string(&path).map_err(|e| io_error(&path, e))
    }

    fn set_full_text(&mut self, container: &ContainerId, text: &str) -> Result<()> {
        self.write_atomic(container, text)
    }

    fn select_range(&mut self, container: &ContainerId, start: usize, len: usize) -> Result<()> {
        self.selection = Some(Selection {
            container: container.clone(),
            start,
            len,
        });
        self.selection_root = Some(container.clone());
        Ok(())
    }

    fn deselect_all(&mut self) -> Result<()> {
        self.selection = None;
        Ok(())
    }

    fn replace_range(
        &mut self,
        container: &ContainerId,
        start: usize,
        old_len: usize,
        new_text: &str,
    ) -> Result<()> {
        let current = self.get_full_text(container)?;
        let updated = splice(&current, start, old_len, new_text)?;
        self.write_atomic(container, &updated)?;
        self.select_range(container, start, new_text.len())
    }
}
