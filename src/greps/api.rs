//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every greps operation, whatever UI drives it.
//!
//! It:
//! - **Owns** the search state of one dialog: the text store, the search session,
//!   the pattern compiler and the query repository
//! - **Dispatches** to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic, no I/O and no formatting.
//!
//! ## Generic over both stores
//!
//! `GrepsApi<T: TextStore, B: QueryBackend>`:
//! - Production: `GrepsApi<FileTextStore, FsQueryBackend>`
//! - Testing: `GrepsApi<InMemoryTextStore, MemQueryBackend>`

use crate::commands::{self, Workspace};
use crate::engine::{CursorState, Mode};
use crate::error::Result;
use crate::model::{HistoryKind, Scope};
use crate::repository::QueryRepository;
use crate::store::QueryBackend;
use crate::text::TextStore;

pub struct GrepsApi<T: TextStore, B: QueryBackend> {
    workspace: Workspace<T>,
    queries: QueryRepository<B>,
    paths: commands::GrepsPaths,
}

impl<T: TextStore, B: QueryBackend> GrepsApi<T, B> {
    pub fn new(store: T, backend: B, paths: commands::GrepsPaths) -> Self {
        Self {
            workspace: Workspace::new(store),
            queries: QueryRepository::new(backend),
            paths,
        }
    }

    pub fn find_next(&mut self, request: &SearchRequest) -> Result<commands::CmdResult> {
        commands::find::run(&mut self.workspace, &self.queries, request)
    }

    pub fn replace_current(&mut self, request: &SearchRequest) -> Result<commands::CmdResult> {
        commands::replace::run(&mut self.workspace, request)
    }

    pub fn replace_and_find(&mut self, request: &SearchRequest) -> Result<commands::CmdResult> {
        commands::replace_find::run(&mut self.workspace, &self.queries, request)
    }

    pub fn replace_all(&mut self, request: &SearchRequest) -> Result<commands::CmdResult> {
        commands::replace_all::run(&mut self.workspace, request)
    }

    /// Drops the current walk, as when the dialog's fields change.
    pub fn reset_search(&mut self) {
        self.workspace.session.reset();
    }

    pub fn search_state(&self) -> CursorState {
        self.workspace.session.state()
    }

    pub fn list_queries(&self) -> Result<commands::CmdResult> {
        commands::queries::list(&self.queries)
    }

    pub fn show_query(&self, name: &str) -> Result<commands::CmdResult> {
        commands::queries::show(&self.queries, name)
    }

    pub fn save_query(
        &self,
        name: &str,
        pattern: &str,
        replacement: &str,
    ) -> Result<commands::CmdResult> {
        commands::queries::save(&self.queries, name, pattern, replacement)
    }

    pub fn delete_query(&self, name: &str) -> Result<commands::CmdResult> {
        commands::queries::delete(&self.queries, name)
    }

    pub fn run_query(&mut self, scope: Scope, name: &str) -> Result<commands::CmdResult> {
        commands::queries::run(&mut self.workspace, &self.queries, scope, name)
    }

    pub fn history(&self, kind: HistoryKind) -> Result<commands::CmdResult> {
        commands::history::run(&self.queries, kind)
    }

    pub fn normalize(&self, text: &str, mode: Mode) -> Result<commands::CmdResult> {
        commands::inspect::normalize_text(text, mode)
    }

    pub fn tags(&self, mode: Mode) -> Result<commands::CmdResult> {
        commands::inspect::tags(mode)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.paths, &self.queries)
    }

    pub fn paths(&self) -> &commands::GrepsPaths {
        &self.paths
    }

    pub fn text_store(&self) -> &T {
        &self.workspace.store
    }

    pub fn text_store_mut(&mut self) -> &mut T {
        &mut self.workspace.store
    }

    pub fn queries(&self) -> &QueryRepository<B> {
        &self.queries
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, FoundMatch, GrepsPaths, MessageLevel, SearchRequest};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrepsError;
    use crate::repository::CUSTOM_SENTINEL;
    use crate::store::memory::MemQueryBackend;
    use crate::text::memory::fixtures::DocumentFixture;
    use crate::text::memory::InMemoryTextStore;

    fn api(stories: &[&str]) -> GrepsApi<InMemoryTextStore, MemQueryBackend> {
        DocumentFixture::new().with_stories(stories).into_api()
    }

    #[test]
    fn find_then_replace_goes_through_the_same_session() {
        let mut api = DocumentFixture::new().with_story("cat dog").into_api();
        let request = SearchRequest::new(Scope::Document, "cat", "dog");

        assert!(api.find_next(&request).unwrap().found.is_some());
        assert_eq!(api.search_state(), CursorState::Active);
        api.replace_current(&request).unwrap();

        let id = api.text_store().story_ids()[0].clone();
        assert_eq!(api.text_store().text(&id), Some("dog dog"));
    }

    #[test]
    fn reset_search_forgets_the_match() {
        let mut api = api(&["cat"]);
        let request = SearchRequest::new(Scope::Document, "cat", "dog");
        api.find_next(&request).unwrap();
        api.reset_search();
        assert!(matches!(
            api.replace_current(&request),
            Err(GrepsError::NoActiveMatch)
        ));
    }

    #[test]
    fn queries_dispatch_to_the_repository() {
        let mut api = api(&["a.b"]);
        api.save_query("dot", "\\.", "<BULLET>").unwrap();
        assert_eq!(
            api.list_queries().unwrap().listed,
            vec!["dot", CUSTOM_SENTINEL]
        );
        assert_eq!(api.run_query(Scope::Document, "dot").unwrap().replaced_count, Some(1));
        assert_eq!(api.history(HistoryKind::FindWhat).unwrap().listed, vec!["\\."]);
    }

    #[test]
    fn selecting_another_story_moves_story_scope() {
        let mut api = api(&["cat", "cat"]);
        let first = api.text_store().story_ids()[0].clone();
        api.text_store_mut().set_selection_root(Some(first));

        let result = api
            .find_next(&SearchRequest::new(Scope::Story, "cat", ""))
            .unwrap();
        assert_eq!(result.found.unwrap().found.container.as_str(), "story-1");
    }

    #[test]
    fn story_scope_follows_the_store_selection() {
        let mut api = DocumentFixture::new()
            .with_stories(&["cat", "cat"])
            .with_selection_in(1)
            .into_api();

        let result = api
            .find_next(&SearchRequest::new(Scope::Story, "cat", ""))
            .unwrap();
        assert_eq!(result.found.unwrap().found.container.as_str(), "story-2");
    }
}
