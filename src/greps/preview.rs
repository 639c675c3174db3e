//! Line previews for reported matches.

use serde::Serialize;

/// A segment of a preview line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatchSegment {
    Plain(String),
    Match(String),
}

/// The line holding a match, split around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchPreview {
    /// 1-based
    pub line_number: usize,
    pub segments: Vec<MatchSegment>,
}

/// Shown in place of a break inside the matched text.
const BREAK_MARKER: char = '¶';

fn is_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}')
}

/// Builds the preview for the byte range `start..end` of `text`.
///
/// Returns `None` if the range is not a valid slice of `text`.
pub fn preview(text: &str, start: usize, end: usize) -> Option<MatchPreview> {
    if start > end || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return None;
    }
    let before = text.get(..start)?;

    let line_start = before
        .char_indices()
        .rev()
        .find(|(_, c)| is_break(*c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    let line_end = text[end..]
        .char_indices()
        .find(|(_, c)| is_break(*c))
        .map_or(text.len(), |(i, _)| end + i);

    let mut line_number = 1;
    let mut prev = None;
    for c in before.chars() {
        // \r\n is one break.
        if is_break(c) && !(c == '\n' && prev == Some('\r')) {
            line_number += 1;
        }
        prev = Some(c);
    }

    let matched: String = text[start..end]
        .chars()
        .map(|c| if is_break(c) { BREAK_MARKER } else { c })
        .collect();

    let mut segments = Vec::new();
    if line_start < start {
        segments.push(MatchSegment::Plain(text[line_start..start].to_string()));
    }
    segments.push(MatchSegment::Match(matched));
    if end < line_end {
        segments.push(MatchSegment::Plain(text[end..line_end].to_string()));
    }

    Some(MatchPreview {
        line_number,
        segments,
    })
}
