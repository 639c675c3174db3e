use super::{replace_all, CmdMessage, CmdResult, SearchRequest, Workspace};
use crate::error::{GrepsError, Result};
use crate::model::Scope;
use crate::repository::QueryRepository;
use crate::store::QueryBackend;
use crate::text::TextStore;

pub fn list<B: QueryBackend>(repo: &QueryRepository<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_listed(repo.list_names()?))
}

pub fn show<B: QueryBackend>(repo: &QueryRepository<B>, name: &str) -> Result<CmdResult> {
    match repo.get(name)? {
        Some(query) => Ok(CmdResult::default().with_query(query)),
        None => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::error(format!("No query named {}", name)));
            Ok(result)
        }
    }
}

pub fn save<B: QueryBackend>(
    repo: &QueryRepository<B>,
    name: &str,
    pattern: &str,
    replacement: &str,
) -> Result<CmdResult> {
    repo.upsert(name, pattern, replacement)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Query <{}> saved.", name.trim())));
    Ok(result)
}

pub fn delete<B: QueryBackend>(repo: &QueryRepository<B>, name: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if repo.delete(name)? {
        result.add_message(CmdMessage::success(format!("Query <{}> deleted.", name)));
    } else {
        result.add_message(CmdMessage::info(format!("Nothing to delete for <{}>.", name)));
    }
    Ok(result)
}

/// Replace-all using a saved query's pattern and replacement.
pub fn run<T: TextStore, B: QueryBackend>(
    ws: &mut Workspace<T>,
    repo: &QueryRepository<B>,
    scope: Scope,
    name: &str,
) -> Result<CmdResult> {
    let query = repo
        .get(name)?
        .ok_or_else(|| GrepsError::Api(format!("No query named {}", name)))?;
    let request = SearchRequest::new(scope, query.pattern, query.replacement);
    replace_all::run(ws, &request)
}
