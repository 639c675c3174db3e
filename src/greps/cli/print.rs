use colored::Colorize;
use greps::api::{CmdMessage, FoundMatch, MessageLevel};
use greps::config::GrepsConfig;
use greps::engine::normalize::TagEntry;
use greps::model::Query;
use greps::preview::{MatchPreview, MatchSegment};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
/// Context kept before a match when the line has to be clipped.
const LEAD_WIDTH: usize = 30;
const ELLIPSIS: char = '…';

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// `story:line:start..end  text with the match highlighted`
pub(super) fn print_found(found: &FoundMatch) {
    let m = &found.found;
    let line = found
        .preview
        .as_ref()
        .map(|p| p.line_number.to_string())
        .unwrap_or_else(|| "?".to_string());
    let location = format!("{}:{}:{}..{}", m.container, line, m.start, m.end);
    let available = LINE_WIDTH.saturating_sub(location.width() + 2);
    let text = found
        .preview
        .as_ref()
        .map(|p| render_preview(p, available))
        .unwrap_or_default();
    println!("{}  {}", location.cyan(), text);
}

fn render_preview(preview: &MatchPreview, max_width: usize) -> String {
    let mut out = String::new();
    let mut remaining = max_width;
    for (i, segment) in preview.segments.iter().enumerate() {
        if remaining == 0 {
            break;
        }
        match segment {
            MatchSegment::Plain(text) if i == 0 => {
                let lead = tail_to_width(text, LEAD_WIDTH.min(remaining));
                remaining = remaining.saturating_sub(lead.width());
                out.push_str(&lead);
            }
            MatchSegment::Plain(text) => {
                let clipped = truncate_to_width(text, remaining);
                remaining = remaining.saturating_sub(clipped.width());
                out.push_str(&clipped);
            }
            MatchSegment::Match(text) => {
                let clipped = truncate_to_width(text, remaining);
                remaining = remaining.saturating_sub(clipped.width());
                out.push_str(&clipped.red().bold().to_string());
            }
        }
    }
    out
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push(ELLIPSIS);
    result
}

/// Keeps the end of `s`, marking the cut with a leading ellipsis.
fn tail_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut kept = Vec::new();
    let mut current_width = 0;
    for c in s.chars().rev() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        kept.push(c);
        current_width += char_width;
    }
    std::iter::once(ELLIPSIS).chain(kept.into_iter().rev()).collect()
}

pub(super) fn print_list(items: &[String], empty: &str) {
    if items.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    for (i, item) in items.iter().enumerate() {
        println!("{:>3}. {}", i + 1, item);
    }
}

pub(super) fn print_query(name: &str, query: &Query) {
    println!("{}", name.bold());
    println!("  find:   {}", query.pattern);
    println!("  change: {}", query.replacement);
}

pub(super) fn print_config(config: &GrepsConfig) {
    for key in GrepsConfig::keys() {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

pub(super) fn print_tags(tags: &[&TagEntry]) {
    let tag_width = tags.iter().map(|t| t.tag.width()).max().unwrap_or(0);
    let mut group = None;
    for entry in tags {
        if group != Some(entry.group) {
            group = Some(entry.group);
            println!("{}", format!("{:?}", entry.group).bold());
        }
        let tag = format!("{:<width$}", entry.tag, width = tag_width);
        println!("  {}  {}", tag.yellow(), entry.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_marks_the_cut() {
        assert_eq!(truncate_to_width("abcdef", 10), "abcdef");
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(tail_to_width("abcdef", 4), "…def");
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn previews_keep_the_match_visible() {
        colored::control::set_override(false);
        let preview = MatchPreview {
            line_number: 1,
            segments: vec![
                MatchSegment::Plain("x".repeat(80)),
                MatchSegment::Match("hit".to_string()),
                MatchSegment::Plain(" tail".to_string()),
            ],
        };
        let rendered = render_preview(&preview, 40);
        assert!(rendered.starts_with('…'));
        assert!(rendered.contains("hit"));
        assert!(rendered.width() <= 40);
    }
}
