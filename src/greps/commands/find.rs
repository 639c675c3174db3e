use super::{empty_pattern, plural, prepare_pattern, CmdMessage, CmdResult, FoundMatch};
use super::{SearchRequest, Workspace};
use crate::error::Result;
use crate::model::Step;
use crate::preview::preview;
use crate::repository::QueryRepository;
use crate::store::QueryBackend;
use crate::text::TextStore;

/// Find next: starts or resumes the walk and reports one match.
pub fn run<T: TextStore, B: QueryBackend>(
    ws: &mut Workspace<T>,
    repo: &QueryRepository<B>,
    request: &SearchRequest,
) -> Result<CmdResult> {
    let Some(pattern) = prepare_pattern(ws, &request.pattern)? else {
        return Ok(empty_pattern());
    };

    ws.session
        .ensure_initialized(request.scope, &pattern, &mut ws.compiler, &ws.store)?;
    let step = ws.session.advance(&mut ws.store)?;

    let mut result = CmdResult::default();
    report_step(ws, repo, request, step, &mut result);
    Ok(result)
}

/// Fills `result` from a find-next step and records the request in the
/// histories when something was found.
pub(crate) fn report_step<T: TextStore, B: QueryBackend>(
    ws: &Workspace<T>,
    repo: &QueryRepository<B>,
    request: &SearchRequest,
    step: Step,
    result: &mut CmdResult,
) {
    match step {
        Step::Found(found) => {
            let preview = ws
                .session
                .cached_text(&found.container)
                .and_then(|text| preview(text, found.start, found.end));
            if let Err(e) = repo.record_search(&request.pattern, &request.replacement) {
                result.add_message(CmdMessage::warning(format!(
                    "Could not update history: {}",
                    e
                )));
            }
            result.found = Some(FoundMatch { found, preview });
        }
        Step::Exhausted { match_count } => {
            result.exhausted = Some(match_count);
            result.add_message(CmdMessage::info(format!(
                "Found {}.",
                plural(match_count, "match", "matches")
            )));
        }
    }
}
