//! The resumable find-next cursor.
//!
//! A [`SearchSession`] is either idle or walking an ordered list of containers.
//! While walking it keeps a read-through cache of each container's text. The
//! cache is the only source of offsets during a walk: it is filled on first
//! touch and updated in place by replaces, never re-read from the store.

use super::pattern::{CompiledPattern, PatternCompiler};
use crate::error::Result;
use crate::model::{ContainerId, Match, Scope, Step};
use crate::text::TextStore;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Observable state of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Idle,
    Active,
}

#[derive(Debug)]
pub(crate) struct Walk {
    pub(crate) scope: Scope,
    pub(crate) pattern_text: String,
    pub(crate) compiled: CompiledPattern,
    pub(crate) containers: Vec<ContainerId>,
    pub(crate) container_index: usize,
    pub(crate) char_offset: usize,
    pub(crate) match_count: usize,
    pub(crate) text_cache: HashMap<ContainerId, String>,
}

impl Walk {
    pub(crate) fn current_container(&self) -> Option<&ContainerId> {
        self.containers.get(self.container_index)
    }
}

#[derive(Debug, Default)]
pub struct SearchSession {
    pub(crate) walk: Option<Walk>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CursorState {
        match self.walk {
            Some(_) => CursorState::Active,
            None => CursorState::Idle,
        }
    }

    pub fn scope(&self) -> Option<Scope> {
        self.walk.as_ref().map(|w| w.scope)
    }

    pub fn pattern_text(&self) -> Option<&str> {
        self.walk.as_ref().map(|w| w.pattern_text.as_str())
    }

    pub fn containers(&self) -> &[ContainerId] {
        self.walk.as_ref().map_or(&[], |w| w.containers.as_slice())
    }

    pub fn container_index(&self) -> usize {
        self.walk.as_ref().map_or(0, |w| w.container_index)
    }

    pub fn char_offset(&self) -> usize {
        self.walk.as_ref().map_or(0, |w| w.char_offset)
    }

    pub fn match_count(&self) -> usize {
        self.walk.as_ref().map_or(0, |w| w.match_count)
    }

    /// Cached text of a container, if the walk has read it.
    pub fn cached_text(&self, container: &ContainerId) -> Option<&str> {
        self.walk
            .as_ref()
            .and_then(|w| w.text_cache.get(container))
            .map(String::as_str)
    }

    pub fn reset(&mut self) {
        if self.walk.take().is_some() {
            debug!("search session reset");
        }
    }

    /// Starts a walk for `scope` and `pattern_text`, or keeps the current one
    /// when both are unchanged.
    ///
    /// A compile failure leaves the session idle.
    pub fn ensure_initialized<T: TextStore>(
        &mut self,
        scope: Scope,
        pattern_text: &str,
        compiler: &mut PatternCompiler,
        store: &T,
    ) -> Result<()> {
        if let Some(walk) = &self.walk {
            if walk.scope == scope && walk.pattern_text == pattern_text {
                if !walk.containers.is_empty() {
                    return Ok(());
                }
            } else {
                self.reset();
            }
        }

        let compiled = match compiler.compile(pattern_text) {
            Ok(compiled) => compiled,
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };
        let containers = resolve_containers(store, scope)?;
        debug!(%scope, pattern = pattern_text, containers = containers.len(), "search session started");

        self.walk = Some(Walk {
            scope,
            pattern_text: pattern_text.to_string(),
            compiled,
            containers,
            container_index: 0,
            char_offset: 0,
            match_count: 0,
            text_cache: HashMap::new(),
        });
        Ok(())
    }

    /// Finds the next non-empty match at or after the cursor, selecting it in
    /// the store.
    ///
    /// Containers that cannot be read are skipped. A zero-length match ends the
    /// search of its container. When every container is consumed the session
    /// reports the total and goes idle.
    pub fn advance<T: TextStore>(&mut self, store: &mut T) -> Result<Step> {
        let Some(walk) = self.walk.as_mut() else {
            return Ok(Step::Exhausted { match_count: 0 });
        };

        if let Err(e) = store.deselect_all() {
            warn!(error = %e, "could not clear the selection");
        }

        while walk.container_index < walk.containers.len() {
            let container = walk.containers[walk.container_index].clone();
            let text = match cached_text(&mut walk.text_cache, &container, &*store) {
                Ok(text) => text,
                Err(e) => {
                    warn!(story = %container, error = %e, "skipping unreadable story");
                    walk.container_index += 1;
                    walk.char_offset = 0;
                    continue;
                }
            };

            let found = if walk.char_offset > text.len() {
                None
            } else {
                match walk.compiled.find_from(text, walk.char_offset) {
                    Ok(found) => found,
                    Err(e) => {
                        self.reset();
                        return Err(e);
                    }
                }
            };

            match found {
                Some((start, end)) if end > start => {
                    if let Err(e) = store.select_range(&container, start, end - start) {
                        warn!(story = %container, error = %e, "could not select match");
                    }
                    walk.char_offset = end;
                    walk.match_count += 1;
                    return Ok(Step::Found(Match {
                        container,
                        start,
                        end,
                    }));
                }
                Some(_) => {
                    debug!(story = %container, "zero-length match, skipping rest of story");
                }
                None => {}
            }
            walk.container_index += 1;
            walk.char_offset = 0;
        }

        let match_count = walk.match_count;
        debug!(match_count, "search session exhausted");
        self.reset();
        Ok(Step::Exhausted { match_count })
    }
}

/// Reads a container through the walk's cache.
///
/// Failed reads are not cached, so a later pass may retry.
pub(crate) fn cached_text<'c, T: TextStore + ?Sized>(
    cache: &'c mut HashMap<ContainerId, String>,
    container: &ContainerId,
    store: &T,
) -> Result<&'c str> {
    if !cache.contains_key(container) {
        let text = store.get_full_text(container)?;
        cache.insert(container.clone(), text);
    }
    Ok(cache.get(container).map(String::as_str).unwrap_or_default())
}

/// Containers a scope ranges over: every story root for `Document`, the
/// selection's root (or nothing) for `Story`.
pub fn resolve_containers<T: TextStore + ?Sized>(
    store: &T,
    scope: Scope,
) -> Result<Vec<ContainerId>> {
    match scope {
        Scope::Document => store.list_story_roots(),
        Scope::Story => Ok(store.current_selection_root()?.into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrepsError;
    use crate::text::memory::InMemoryTextStore;

    fn start(store: &InMemoryTextStore, scope: Scope, pattern: &str) -> SearchSession {
        let mut session = SearchSession::new();
        let mut compiler = PatternCompiler::new();
        session
            .ensure_initialized(scope, pattern, &mut compiler, store)
            .unwrap();
        session
    }

    fn found(step: Step) -> (String, usize, usize) {
        match step {
            Step::Found(m) => (m.container.to_string(), m.start, m.end),
            other => panic!("Expected a match, got {:?}", other),
        }
    }

    #[test]
    fn matches_come_in_text_order() {
        let mut store = InMemoryTextStore::with_stories(["ababab"]);
        let mut session = start(&store, Scope::Document, "ab");

        assert_eq!(found(session.advance(&mut store).unwrap()).1, 0);
        assert_eq!(found(session.advance(&mut store).unwrap()).1, 2);
        assert_eq!(found(session.advance(&mut store).unwrap()).1, 4);
        assert_eq!(
            session.advance(&mut store).unwrap(),
            Step::Exhausted { match_count: 3 }
        );
        assert_eq!(session.state(), CursorState::Idle);
    }

    #[test]
    fn containers_are_walked_in_order() {
        let mut store = InMemoryTextStore::with_stories(["xx", "yxy"]);
        let mut session = start(&store, Scope::Document, "y");

        assert_eq!(
            found(session.advance(&mut store).unwrap()),
            ("story-2".to_string(), 0, 1)
        );
        assert_eq!(
            found(session.advance(&mut store).unwrap()),
            ("story-2".to_string(), 2, 3)
        );
        assert_eq!(
            session.advance(&mut store).unwrap(),
            Step::Exhausted { match_count: 2 }
        );
    }

    #[test]
    fn found_matches_are_selected() {
        let mut store = InMemoryTextStore::with_stories(["say hi"]);
        let mut session = start(&store, Scope::Document, "hi");
        session.advance(&mut store).unwrap();

        let selection = store.selection().unwrap();
        assert_eq!((selection.start, selection.len), (4, 2));
    }

    #[test]
    fn zero_length_match_skips_the_rest_of_the_container() {
        let mut store = InMemoryTextStore::with_stories(["abc", "b"]);
        let mut session = start(&store, Scope::Document, "b*");

        // "abc" yields an empty match at 0, so its "b" is never reported.
        assert_eq!(
            found(session.advance(&mut store).unwrap()),
            ("story-2".to_string(), 0, 1)
        );
        assert_eq!(
            session.advance(&mut store).unwrap(),
            Step::Exhausted { match_count: 1 }
        );
    }

    #[test]
    fn changing_the_pattern_restarts_the_walk() {
        let mut store = InMemoryTextStore::with_stories(["aaa"]);
        let mut compiler = PatternCompiler::new();
        let mut session = SearchSession::new();

        session
            .ensure_initialized(Scope::Document, "a", &mut compiler, &store)
            .unwrap();
        session.advance(&mut store).unwrap();
        session.advance(&mut store).unwrap();
        assert_eq!(session.char_offset(), 2);

        session
            .ensure_initialized(Scope::Document, "a", &mut compiler, &store)
            .unwrap();
        assert_eq!(session.char_offset(), 2);

        session
            .ensure_initialized(Scope::Document, "aa", &mut compiler, &store)
            .unwrap();
        assert_eq!(session.char_offset(), 0);
        assert_eq!(session.match_count(), 0);
    }

    #[test]
    fn compile_failure_leaves_the_session_idle() {
        let mut store = InMemoryTextStore::with_stories(["abc"]);
        let mut compiler = PatternCompiler::new();
        let mut session = SearchSession::new();
        session
            .ensure_initialized(Scope::Document, "a", &mut compiler, &store)
            .unwrap();
        session.advance(&mut store).unwrap();

        let err = session
            .ensure_initialized(Scope::Document, "(", &mut compiler, &store)
            .unwrap_err();
        assert!(matches!(err, GrepsError::Compile(_)));
        assert_eq!(session.state(), CursorState::Idle);
    }

    #[test]
    fn story_scope_uses_the_selection_root() {
        let mut store = InMemoryTextStore::with_stories(["cat", "cat"]);
        let second = store.story_ids()[1].clone();
        store.set_selection_root(Some(second.clone()));

        let mut session = start(&store, Scope::Story, "cat");
        assert_eq!(session.containers(), &[second]);
        assert_eq!(found(session.advance(&mut store).unwrap()).0, "story-2");
    }

    #[test]
    fn story_scope_without_selection_finds_nothing() {
        let mut store = InMemoryTextStore::with_stories(["cat"]);
        let mut session = start(&store, Scope::Story, "cat");
        assert!(session.containers().is_empty());
        assert_eq!(
            session.advance(&mut store).unwrap(),
            Step::Exhausted { match_count: 0 }
        );
    }

    #[test]
    fn unreadable_containers_are_skipped() {
        let mut store = InMemoryTextStore::with_stories(["cat", "cat"]);
        let first = store.story_ids()[0].clone();
        store.fail_reads(&first);

        let mut session = start(&store, Scope::Document, "cat");
        assert_eq!(found(session.advance(&mut store).unwrap()).0, "story-2");
    }

    #[test]
    fn offsets_are_in_bytes() {
        let mut store = InMemoryTextStore::with_stories(["é cat"]);
        let mut session = start(&store, Scope::Document, "cat");
        let (_, start, end) = found(session.advance(&mut store).unwrap());
        assert_eq!((start, end), (3, 6));
        assert_eq!(session.char_offset(), 6);
    }

    #[test]
    fn cached_text_is_not_reread() {
        let mut store = InMemoryTextStore::with_stories(["cat cat"]);
        let id = store.story_ids()[0].clone();
        let mut session = start(&store, Scope::Document, "cat");
        session.advance(&mut store).unwrap();

        store.set_full_text(&id, "dog dog").unwrap();
        assert_eq!(found(session.advance(&mut store).unwrap()).1, 4);
        assert_eq!(session.cached_text(&id), Some("cat cat"));
    }

    #[test]
    fn selection_failures_do_not_stop_the_walk() {
        let mut store = InMemoryTextStore::with_stories(["cat"]);
        store.set_simulate_selection_error(true);
        let mut session = start(&store, Scope::Document, "cat");
        assert_eq!(found(session.advance(&mut store).unwrap()).1, 0);
    }

    #[test]
    fn advancing_an_idle_session_reports_nothing() {
        let mut store = InMemoryTextStore::with_stories(["cat"]);
        let mut session = SearchSession::new();
        assert_eq!(
            session.advance(&mut store).unwrap(),
            Step::Exhausted { match_count: 0 }
        );
    }
}
