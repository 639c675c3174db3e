use super::find::report_step;
use super::{empty_pattern, prepare_pair, CmdMessage, CmdResult, SearchRequest, Workspace};
use crate::engine::replace_and_find;
use crate::error::Result;
use crate::repository::QueryRepository;
use crate::store::QueryBackend;
use crate::text::TextStore;

/// Replaces the current match and moves on to the next one.
pub fn run<T: TextStore, B: QueryBackend>(
    ws: &mut Workspace<T>,
    repo: &QueryRepository<B>,
    request: &SearchRequest,
) -> Result<CmdResult> {
    let Some((pattern, replacement)) = prepare_pair(ws, request)? else {
        return Ok(empty_pattern());
    };

    let (replaced, step) =
        replace_and_find(&mut ws.session, &mut ws.store, &pattern, &replacement)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Replaced match in {} at {}..{}.",
        replaced.container, replaced.start, replaced.end
    )));
    result.replaced = Some(replaced);
    report_step(ws, repo, request, step, &mut result);
    Ok(result)
}
