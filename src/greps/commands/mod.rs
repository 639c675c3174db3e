use crate::config::GrepsConfig;
use crate::engine::normalize::TagEntry;
use crate::engine::{normalize, Mode, PatternCompiler, SearchSession};
use crate::error::Result;
use crate::model::{ContainerId, Match, Query, ReplacedRange, Scope};
use crate::preview::MatchPreview;
use crate::text::TextStore;
use std::path::PathBuf;

pub mod config;
pub mod find;
pub mod history;
pub mod init;
pub mod inspect;
pub mod queries;
pub mod replace;
pub mod replace_all;
pub mod replace_find;

#[derive(Debug, Clone)]
pub struct GrepsPaths {
    /// Holds `config.json` and `queries.json`.
    pub data_dir: PathBuf,
}

/// The live search state of one dialog: the document, the cursor walking it
/// and the compiler cache.
pub struct Workspace<T: TextStore> {
    pub store: T,
    pub session: SearchSession,
    pub compiler: PatternCompiler,
}

impl<T: TextStore> Workspace<T> {
    pub fn new(store: T) -> Self {
        Self {
            store,
            session: SearchSession::new(),
            compiler: PatternCompiler::new(),
        }
    }
}

/// What the user typed, before normalization.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub scope: Scope,
    pub pattern: String,
    pub replacement: String,
}

impl SearchRequest {
    pub fn new(scope: Scope, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            scope,
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A match reported by find-next, with the line it sits on.
#[derive(Debug, Clone)]
pub struct FoundMatch {
    pub found: Match,
    pub preview: Option<MatchPreview>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub found: Option<FoundMatch>,
    pub replaced: Option<ReplacedRange>,
    pub replaced_count: Option<usize>,
    pub skipped: Vec<(ContainerId, String)>,
    /// Set when a walk ran out of containers; carries its match count.
    pub exhausted: Option<usize>,
    pub listed: Vec<String>,
    pub query: Option<Query>,
    pub normalized: Option<String>,
    pub tags: Vec<&'static TagEntry>,
    pub config: Option<GrepsConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed(mut self, listed: Vec<String>) -> Self {
        self.listed = listed;
        self
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_config(mut self, config: GrepsConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Normalizes the pattern side of a request.
///
/// A normalization failure resets the session. `None` means the pattern is
/// empty after normalization, which also resets the session.
pub(crate) fn prepare_pattern<T: TextStore>(
    ws: &mut Workspace<T>,
    raw: &str,
) -> Result<Option<String>> {
    match normalize(raw, Mode::Pattern) {
        Ok(pattern) if pattern.is_empty() => {
            ws.session.reset();
            Ok(None)
        }
        Ok(pattern) => Ok(Some(pattern)),
        Err(e) => {
            ws.session.reset();
            Err(e)
        }
    }
}

/// Normalizes both sides of a request, resetting the session on failure.
pub(crate) fn prepare_pair<T: TextStore>(
    ws: &mut Workspace<T>,
    request: &SearchRequest,
) -> Result<Option<(String, String)>> {
    let Some(pattern) = prepare_pattern(ws, &request.pattern)? else {
        return Ok(None);
    };
    match normalize(&request.replacement, Mode::Replacement) {
        Ok(replacement) => Ok(Some((pattern, replacement))),
        Err(e) => {
            ws.session.reset();
            Err(e)
        }
    }
}

pub(crate) fn empty_pattern() -> CmdResult {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning("Nothing to search for: the pattern is empty."));
    result
}

pub(crate) fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}
