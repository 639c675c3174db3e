use super::{empty_pattern, plural, prepare_pair, CmdMessage, CmdResult, SearchRequest, Workspace};
use crate::engine::replace_all;
use crate::error::Result;
use crate::text::TextStore;

/// Replaces every match in the request's scope.
pub fn run<T: TextStore>(ws: &mut Workspace<T>, request: &SearchRequest) -> Result<CmdResult> {
    let Some((pattern, replacement)) = prepare_pair(ws, request)? else {
        return Ok(empty_pattern());
    };

    let summary = replace_all(
        &mut ws.session,
        &mut ws.compiler,
        &mut ws.store,
        request.scope,
        &pattern,
        &replacement,
    )?;

    let mut result = CmdResult::default();
    if summary.processed == 0 && summary.skipped.is_empty() {
        result.add_message(CmdMessage::info("No story to process."));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Replaced {}.",
            plural(summary.replaced, "match", "matches")
        )));
    }
    for (container, reason) in &summary.skipped {
        result.add_message(CmdMessage::warning(format!(
            "Skipped {}: {}",
            container, reason
        )));
    }
    result.replaced_count = Some(summary.replaced);
    result.skipped = summary.skipped;
    Ok(result)
}
