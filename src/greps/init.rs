use crate::api::{GrepsApi, GrepsPaths};
use crate::config::GrepsConfig;
use crate::error::{GrepsError, Result};
use crate::store::fs::FsQueryBackend;
use crate::text::fs::FileTextStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Overrides the data directory (config and saved queries).
pub const HOME_ENV: &str = "GREPS_HOME";

pub struct GrepsContext {
    pub api: GrepsApi<FileTextStore, FsQueryBackend>,
    /// True when this run created the query store.
    pub created_store: bool,
}

/// `$GREPS_HOME` if set, otherwise the platform data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    let proj_dirs = ProjectDirs::from("com", "greps", "greps")
        .ok_or_else(|| GrepsError::Api("Could not determine data dir".to_string()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Builds the API for the document in `doc_dir`, with `story` as the story
/// holding the current selection.
pub fn initialize(doc_dir: &Path, story: Option<&str>) -> Result<GrepsContext> {
    let data_dir = data_dir()?;
    let config = GrepsConfig::load(&data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "unreadable config, using defaults");
        GrepsConfig::default()
    });

    let mut store = FileTextStore::new(doc_dir).with_extensions(&config.story_extensions);
    if let Some(story) = story {
        store.select_story(story)?;
    }

    let backend = FsQueryBackend::new(&data_dir);
    let paths = GrepsPaths {
        data_dir: data_dir.clone(),
    };
    let api = GrepsApi::new(store, backend, paths);
    let created_store = api.queries().ensure_exists()?;
    debug!(doc = %doc_dir.display(), data = %data_dir.display(), "context ready");

    Ok(GrepsContext {
        api,
        created_store,
    })
}
