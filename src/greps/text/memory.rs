use super::{check_range, splice, TextStore};
use crate::error::{GrepsError, Result};
use crate::model::{ContainerId, Selection};
use std::collections::{HashMap, HashSet};

/// In-memory document for tests.
///
/// Stories get handles `story-1`, `story-2`, ... in insertion order. Reads,
/// writes and selection changes can be made to fail per container to exercise
/// error paths.
#[derive(Debug, Default)]
pub struct InMemoryTextStore {
    order: Vec<ContainerId>,
    texts: HashMap<ContainerId, String>,
    selection_root: Option<ContainerId>,
    selection: Option<Selection>,
    failing_reads: HashSet<ContainerId>,
    failing_writes: HashSet<ContainerId>,
    simulate_selection_error: bool,
}

impl InMemoryTextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stories<I, S>(stories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for text in stories {
            store.add_story(text);
        }
        store
    }

    pub fn add_story(&mut self, text: impl Into<String>) -> ContainerId {
        let id = ContainerId::new(format!("story-{}", self.order.len() + 1));
        self.order.push(id.clone());
        self.texts.insert(id.clone(), text.into());
        id
    }

    pub fn story_ids(&self) -> &[ContainerId] {
        &self.order
    }

    /// Text of a story as the store holds it, bypassing failure injection.
    pub fn text(&self, container: &ContainerId) -> Option<&str> {
        self.texts.get(container).map(String::as_str)
    }

    pub fn set_selection_root(&mut self, container: Option<ContainerId>) {
        self.selection_root = container;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn fail_reads(&mut self, container: &ContainerId) {
        self.failing_reads.insert(container.clone());
    }

    pub fn fail_writes(&mut self, container: &ContainerId) {
        self.failing_writes.insert(container.clone());
    }

    pub fn set_simulate_selection_error(&mut self, simulate: bool) {
        self.simulate_selection_error = simulate;
    }

    fn writable(&mut self, container: &ContainerId) -> Result<&mut String> {
        if self.failing_writes.contains(container) {
            return Err(GrepsError::StoreIo(format!(
                "Simulated write error on {}",
                container
            )));
        }
        self.texts
            .get_mut(container)
            .ok_or_else(|| GrepsError::StoreIo(format!("Unknown story: {}", container)))
    }
}

impl TextStore for InMemoryTextStore {
    fn list_story_roots(&self) -> Result<Vec<ContainerId>> {
        Ok(self.order.clone())
    }

    fn current_selection_root(&self) -> Result<Option<ContainerId>> {
        Ok(self.selection_root.clone())
    }

    fn get_full_text(&self, container: &ContainerId) -> Result<String> {
        if self.failing_reads.contains(container) {
            return Err(GrepsError::StoreIo(format!(
                "Simulated read error on {}",
                container
            )));
        }
        self.texts
            .get(container)
            .cloned()
            .ok_or_else(|| GrepsError::StoreIo(format!("Unknown story: {}", container)))
    }

    fn set_full_text(&mut self, container: &ContainerId, text: &str) -> Result<()> {
        let body = self.writable(container)?;
        *body = text.to_string();
        Ok(())
    }

    fn select_range(&mut self, container: &ContainerId, start: usize, len: usize) -> Result<()> {
        if self.simulate_selection_error {
            return Err(GrepsError::StoreIo("Simulated selection error".to_string()));
        }
        let text = self
            .texts
            .get(container)
            .ok_or_else(|| GrepsError::StoreIo(format!("Unknown story: {}", container)))?;
        check_range(text, start, len)?;
        self.selection = Some(Selection {
            container: container.clone(),
            start,
            len,
        });
        self.selection_root = Some(container.clone());
        Ok(())
    }

    fn deselect_all(&mut self) -> Result<()> {
        if self.simulate_selection_error {
            return Err(GrepsError::StoreIo("Simulated selection error".to_string()));
        }
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
        let body = self.writable(container)?;
        *body = splice(body, start, old_len, new_text)?;
        self.selection = Some(Selection {
            container: container.clone(),
            start,
            len: new_text.len(),
        });
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::api::{GrepsApi, GrepsPaths};
    use crate::store::memory::MemQueryBackend;
    use std::path::PathBuf;

    /// Builds an in-memory document and an API over it.
    pub struct DocumentFixture {
        pub store: InMemoryTextStore,
        pub backend: MemQueryBackend,
    }

    impl Default for DocumentFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DocumentFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryTextStore::new(),
                backend: MemQueryBackend::new(),
            }
        }

        pub fn with_story(mut self, text: &str) -> Self {
            self.store.add_story(text);
            self
        }

        pub fn with_stories(mut self, texts: &[&str]) -> Self {
            for text in texts {
                self.store.add_story(*text);
            }
            self
        }

        /// Puts the selection in the story at `index` (0-based).
        pub fn with_selection_in(mut self, index: usize) -> Self {
            let id = self.store.story_ids().get(index).cloned();
            self.store.set_selection_root(id);
            self
        }

        pub fn into_api(self) -> GrepsApi<InMemoryTextStore, MemQueryBackend> {
            GrepsApi::new(
                self.store,
                self.backend,
                GrepsPaths {
                    data_dir: PathBuf::from("memory://greps"),
                },
            )
        }
    }
}
