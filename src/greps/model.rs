use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The set of stories a search or replace ranges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Every story root in the document.
    Document,
    /// Only the story holding the current selection.
    Story,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Document => write!(f, "Document"),
            Scope::Story => write!(f, "Story"),
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "document" | "doc" => Ok(Scope::Document),
            "story" => Ok(Scope::Story),
            other => Err(format!("Unknown scope: {}", other)),
        }
    }
}

/// Opaque handle to one story root owned by a text store.
///
/// Identity is the handle itself, never the text behind it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(handle: &str) -> Self {
        Self::new(handle)
    }
}

/// A non-empty match reported by the search cursor. Offsets are UTF-8 byte
/// offsets into the container's full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub container: ContainerId,
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The range a single replace wrote, left selected in the text store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedRange {
    pub container: ContainerId,
    pub start: usize,
    pub end: usize,
}

/// A selected range inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub container: ContainerId,
    pub start: usize,
    pub len: usize,
}

/// Outcome of one find-next step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Found(Match),
    /// Every container was walked; carries the matches counted during the pass.
    Exhausted { match_count: usize },
}

/// A saved pattern/replacement pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub pattern: String,
    pub replacement: String,
}

impl Query {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// The two recency lists kept next to the saved queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryKind {
    FindWhat,
    ChangeTo,
}

impl HistoryKind {
    /// Reserved key of this list in the query document.
    pub fn key(&self) -> &'static str {
        match self {
            HistoryKind::FindWhat => "_find_what_history",
            HistoryKind::ChangeTo => "_change_to_history",
        }
    }
}
