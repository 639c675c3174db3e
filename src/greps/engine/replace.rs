//! Replacing the current match and bulk replacement over a scope.

use super::pattern::{CompiledPattern, PatternCompiler};
use super::session::{resolve_containers, SearchSession};
use super::template::Template;
use crate::error::{GrepsError, Result};
use crate::model::{ContainerId, ReplacedRange, Scope, Step};
use crate::text::{splice, TextStore};
use tracing::{debug, warn};

/// Outcome of a bulk replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceAllSummary {
    /// Substitutions written back to the store.
    pub replaced: usize,
    /// Containers read and searched, whether or not they changed.
    pub processed: usize,
    /// Containers left alone because reading, matching or writing failed.
    pub skipped: Vec<(ContainerId, String)>,
}

/// Replaces the match the session last reported.
///
/// The match is found again in the cached text as the first match ending at
/// the cursor offset. The store is written first; the cache and cursor only
/// move once the write succeeded, so any error leaves the session as it was.
pub fn replace_current<T: TextStore>(
    session: &mut SearchSession,
    store: &mut T,
    pattern_text: &str,
    replacement: &str,
) -> Result<ReplacedRange> {
    let walk = session.walk.as_mut().ok_or(GrepsError::NoActiveMatch)?;
    if walk.pattern_text != pattern_text || walk.char_offset == 0 {
        return Err(GrepsError::NoActiveMatch);
    }
    let container = walk
        .current_container()
        .cloned()
        .ok_or(GrepsError::NoActiveMatch)?;
    let text = match walk.text_cache.get(&container) {
        Some(text) if !text.is_empty() => text,
        _ => return Err(GrepsError::NoActiveMatch),
    };

    let offset = walk.char_offset.min(text.len());
    let (start, end, expansion) = {
        let all = walk.compiled.captures_all(text)?;
        let caps = all
            .iter()
            .find(|caps| caps.get(0).is_some_and(|m| m.end() == offset))
            .ok_or(GrepsError::NoActiveMatch)?;
        let whole = caps.get(0).ok_or(GrepsError::NoActiveMatch)?;
        let template = Template::parse(replacement, &walk.compiled)?;
        (whole.start(), whole.end(), template.expand(caps))
    };
    let updated = splice(text, start, end - start, &expansion)?;

    store.replace_range(&container, start, end - start, &expansion)?;

    debug!(story = %container, start, end, "replaced match");
    walk.text_cache.insert(container.clone(), updated);
    walk.char_offset = start + expansion.len();
    Ok(ReplacedRange {
        container,
        start,
        end: start + expansion.len(),
    })
}

/// Replaces the current match, then continues the walk from just after the
/// inserted text.
pub fn replace_and_find<T: TextStore>(
    session: &mut SearchSession,
    store: &mut T,
    pattern_text: &str,
    replacement: &str,
) -> Result<(ReplacedRange, Step)> {
    let replaced = replace_current(session, store, pattern_text, replacement)?;
    let step = session.advance(store)?;
    Ok((replaced, step))
}

/// Substitutes every match in every container of `scope`.
///
/// Uses the session's containers when it already walks the same scope,
/// otherwise asks the store. Per-container failures are recorded and skipped
/// without undoing earlier containers. The session is idle afterwards.
pub fn replace_all<T: TextStore>(
    session: &mut SearchSession,
    compiler: &mut PatternCompiler,
    store: &mut T,
    scope: Scope,
    pattern_text: &str,
    replacement: &str,
) -> Result<ReplaceAllSummary> {
    let compiled = match compiler.compile(pattern_text) {
        Ok(compiled) => compiled,
        Err(e) => {
            session.reset();
            return Err(e);
        }
    };
    let template = Template::parse(replacement, &compiled)?;

    let reusable = session
        .walk
        .as_ref()
        .filter(|w| w.scope == scope && !w.containers.is_empty())
        .map(|w| w.containers.clone());
    let containers = match reusable {
        Some(containers) => Ok(containers),
        None => resolve_containers(store, scope),
    };
    session.reset();
    let containers = containers?;

    let mut summary = ReplaceAllSummary::default();
    for container in containers {
        let text = match store.get_full_text(&container) {
            Ok(text) => text,
            Err(e) => {
                warn!(story = %container, error = %e, "skipping unreadable story");
                summary.skipped.push((container, e.to_string()));
                continue;
            }
        };
        summary.processed += 1;
        if text.is_empty() {
            continue;
        }

        let (updated, count) = match substitute(&compiled, &template, &text) {
            Ok(result) => result,
            Err(e) => {
                warn!(story = %container, error = %e, "skipping story");
                summary.skipped.push((container, e.to_string()));
                continue;
            }
        };
        if count == 0 {
            continue;
        }

        match store.set_full_text(&container, &updated) {
            Ok(()) => {
                debug!(story = %container, count, "replaced all in story");
                summary.replaced += count;
            }
            Err(e) => {
                warn!(story = %container, error = %e, "could not write story");
                summary.skipped.push((container, e.to_string()));
            }
        }
    }

    if let Err(e) = store.deselect_all() {
        warn!(error = %e, "could not clear the selection");
    }
    Ok(summary)
}

/// One left-to-right, non-overlapping substitution pass.
fn substitute(
    compiled: &CompiledPattern,
    template: &Template,
    text: &str,
) -> Result<(String, usize)> {
    let all = compiled.captures_all(text)?;
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;
    for caps in &all {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&template.expand(caps));
        last = whole.end();
        count += 1;
    }
    out.push_str(&text[last..]);
    Ok((out, count))
}
