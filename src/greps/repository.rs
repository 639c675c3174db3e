//! Saved queries and recency histories on top of a [`QueryBackend`].
//!
//! Every operation loads the whole document, changes it and saves it back.
//! Names starting with `_` are reserved for the history lists and never show
//! up as queries.

use crate::error::{GrepsError, Result};
use crate::model::{HistoryKind, Query};
use crate::store::{QueryBackend, QueryDocument};
use serde_json::Value;
use tracing::debug;

/// Listed after the saved queries; stands for "whatever is typed in the fields".
pub const CUSTOM_SENTINEL: &str = "[Custom]";

pub const HISTORY_LIMIT: usize = 10;

pub struct QueryRepository<B: QueryBackend> {
    backend: B,
}

impl<B: QueryBackend> QueryRepository<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn ensure_exists(&self) -> Result<bool> {
        self.backend.ensure_exists()
    }

    /// Names of saved queries in stored order, followed by the sentinel.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let doc = self.backend.load()?;
        let mut names: Vec<String> = doc
            .iter()
            .filter(|(name, value)| !is_reserved(name) && as_query(value).is_some())
            .map(|(name, _)| name.clone())
            .collect();
        names.push(CUSTOM_SENTINEL.to_string());
        Ok(names)
    }

    pub fn get(&self, name: &str) -> Result<Option<Query>> {
        if is_reserved(name) {
            return Ok(None);
        }
        let doc = self.backend.load()?;
        Ok(doc.get(name).and_then(as_query))
    }

    /// Saves a query under `name` and records both strings in the histories.
    pub fn upsert(&self, name: &str, pattern: &str, replacement: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GrepsError::Api("Query name cannot be empty".to_string()));
        }
        if name == CUSTOM_SENTINEL || is_reserved(name) {
            return Err(GrepsError::Api(format!("{} is a reserved name", name)));
        }

        let mut doc = self.backend.load()?;
        doc.insert(
            name.to_string(),
            Value::Array(vec![
                Value::String(pattern.to_string()),
                Value::String(replacement.to_string()),
            ]),
        );
        push_history(&mut doc, HistoryKind::FindWhat, pattern);
        push_history(&mut doc, HistoryKind::ChangeTo, replacement);
        self.backend.save(&doc)?;
        debug!(name, "saved query");
        Ok(())
    }

    /// Removes a saved query. Returns false, without touching the store, for
    /// the sentinel, reserved names and names that do not exist.
    pub fn delete(&self, name: &str) -> Result<bool> {
        if name == CUSTOM_SENTINEL || is_reserved(name) {
            return Ok(false);
        }
        let mut doc = self.backend.load()?;
        if doc.shift_remove(name).is_none() {
            return Ok(false);
        }
        self.backend.save(&doc)?;
        debug!(name, "deleted query");
        Ok(true)
    }

    pub fn record_history(&self, kind: HistoryKind, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Ok(());
        }
        let mut doc = self.backend.load()?;
        push_history(&mut doc, kind, value);
        self.backend.save(&doc)
    }

    /// Records a find/change pair in one write.
    pub fn record_search(&self, pattern: &str, replacement: &str) -> Result<()> {
        if pattern.trim().is_empty() && replacement.trim().is_empty() {
            return Ok(());
        }
        let mut doc = self.backend.load()?;
        push_history(&mut doc, HistoryKind::FindWhat, pattern);
        push_history(&mut doc, HistoryKind::ChangeTo, replacement);
        self.backend.save(&doc)
    }

    /// A history list, most recent first.
    pub fn history(&self, kind: HistoryKind) -> Result<Vec<String>> {
        let doc = self.backend.load()?;
        Ok(read_history(&doc, kind))
    }
}

fn is_reserved(name: &str) -> bool {
    name.starts_with('_')
}

fn as_query(value: &Value) -> Option<Query> {
    match value.as_array()?.as_slice() {
        [Value::String(pattern), Value::String(replacement)] => {
            Some(Query::new(pattern.as_str(), replacement.as_str()))
        }
        _ => None,
    }
}

fn read_history(doc: &QueryDocument, kind: HistoryKind) -> Vec<String> {
    doc.get(kind.key())
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn push_history(doc: &mut QueryDocument, kind: HistoryKind, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    let mut items = read_history(doc, kind);
    items.retain(|item| item != value);
    items.insert(0, value.to_string());
    items.truncate(HISTORY_LIMIT);
    doc.insert(
        kind.key().to_string(),
        Value::Array(items.into_iter().map(Value::String).collect()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemQueryBackend;
    use serde_json::json;

    fn repo() -> QueryRepository<MemQueryBackend> {
        QueryRepository::new(MemQueryBackend::new())
    }

    #[test]
    fn history_keeps_the_ten_most_recent() {
        let repo = repo();
        for i in 0..11 {
            repo.record_history(HistoryKind::FindWhat, &format!("v{}", i))
                .unwrap();
        }
        let history = repo.history(HistoryKind::FindWhat).unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], "v10");
        assert_eq!(history[9], "v1");
    }

    #[test]
    fn rerecording_moves_to_front_without_growing() {
        let repo = repo();
        for value in ["a", "b", "c"] {
            repo.record_history(HistoryKind::ChangeTo, value).unwrap();
        }
        repo.record_history(HistoryKind::ChangeTo, " a ").unwrap();
        assert_eq!(
            repo.history(HistoryKind::ChangeTo).unwrap(),
            vec!["a", "c", "b"]
        );
    }

    #[test]
    fn blank_values_are_not_recorded() {
        let repo = repo();
        repo.record_history(HistoryKind::FindWhat, "   ").unwrap();
        assert!(repo.backend().snapshot().is_none());
    }

    #[test]
    fn list_names_hides_history_and_malformed_entries() {
        let mut doc = QueryDocument::new();
        doc.insert("dashes".into(), json!(["--", "<EMDASH>"]));
        doc.insert("_find_what_history".into(), json!(["x"]));
        doc.insert("broken".into(), json!(["only one"]));
        doc.insert("numbers".into(), json!([1, 2]));
        doc.insert("spaces".into(), json!(["  +", " "]));
        let repo = QueryRepository::new(MemQueryBackend::with_document(doc));

        assert_eq!(
            repo.list_names().unwrap(),
            vec!["dashes", "spaces", CUSTOM_SENTINEL]
        );
    }

    #[test]
    fn empty_store_lists_only_the_sentinel() {
        assert_eq!(repo().list_names().unwrap(), vec![CUSTOM_SENTINEL]);
    }

    #[test]
    fn upsert_saves_and_records_history() {
        let repo = repo();
        repo.upsert("quotes", "\"(.*?)\"", "«$1»").unwrap();

        assert_eq!(
            repo.get("quotes").unwrap(),
            Some(Query::new("\"(.*?)\"", "«$1»"))
        );
        assert_eq!(repo.history(HistoryKind::FindWhat).unwrap(), vec!["\"(.*?)\""]);
        assert_eq!(repo.history(HistoryKind::ChangeTo).unwrap(), vec!["«$1»"]);
    }

    #[test]
    fn upsert_overwrites_in_place() {
        let repo = repo();
        repo.upsert("a", "1", "2").unwrap();
        repo.upsert("b", "3", "4").unwrap();
        repo.upsert("a", "5", "6").unwrap();
        assert_eq!(repo.list_names().unwrap(), vec!["a", "b", CUSTOM_SENTINEL]);
        assert_eq!(repo.get("a").unwrap(), Some(Query::new("5", "6")));
    }

    #[test]
    fn upsert_rejects_reserved_names() {
        let repo = repo();
        assert!(matches!(repo.upsert("", "a", "b"), Err(GrepsError::Api(_))));
        assert!(matches!(
            repo.upsert(CUSTOM_SENTINEL, "a", "b"),
            Err(GrepsError::Api(_))
        ));
        assert!(matches!(
            repo.upsert("_find_what_history", "a", "b"),
            Err(GrepsError::Api(_))
        ));
    }

    #[test]
    fn delete_is_a_no_op_for_sentinel_and_missing_names() {
        let repo = repo();
        repo.upsert("keep", "a", "b").unwrap();

        assert!(!repo.delete(CUSTOM_SENTINEL).unwrap());
        assert!(!repo.delete("missing").unwrap());
        assert!(!repo.delete("_find_what_history").unwrap());
        assert_eq!(repo.history(HistoryKind::FindWhat).unwrap(), vec!["a"]);

        assert!(repo.delete("keep").unwrap());
        assert_eq!(repo.get("keep").unwrap(), None);
    }

    #[test]
    fn non_array_history_reads_as_empty() {
        let mut doc = QueryDocument::new();
        doc.insert("_change_to_history".into(), json!("oops"));
        let repo = QueryRepository::new(MemQueryBackend::with_document(doc));
        assert!(repo.history(HistoryKind::ChangeTo).unwrap().is_empty());

        repo.record_history(HistoryKind::ChangeTo, "x").unwrap();
        assert_eq!(repo.history(HistoryKind::ChangeTo).unwrap(), vec!["x"]);
    }

    #[test]
    fn write_failures_propagate() {
        let repo = repo();
        repo.backend().set_simulate_write_error(true);
        assert!(repo.record_history(HistoryKind::FindWhat, "x").is_err());
        assert!(repo.upsert("a", "b", "c").is_err());
    }
}
