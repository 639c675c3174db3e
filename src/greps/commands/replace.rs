use super::{empty_pattern, prepare_pair, CmdMessage, CmdResult, SearchRequest, Workspace};
use crate::engine::replace_current;
use crate::error::Result;
use crate::text::TextStore;

/// Replaces the match the last find-next reported.
pub fn run<T: TextStore>(ws: &mut Workspace<T>, request: &SearchRequest) -> Result<CmdResult> {
    let Some((pattern, replacement)) = prepare_pair(ws, request)? else {
        return Ok(empty_pattern());
    };

    let replaced = replace_current(&mut ws.session, &mut ws.store, &pattern, &replacement)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Replaced match in {} at {}..{}.",
        replaced.container, replaced.start, replaced.end
    )));
    result.replaced = Some(replaced);
    Ok(result)
}
