//! Turns the symbolic notation users type into literal pattern or replacement text.
//!
//! Passes run in a fixed order and each one sees the output of the previous:
//!
//! 1. Symbolic tags (`<NBSP>`, `<EMDASH>`, `<LEFTPARENTHESIS>`, ...), both modes.
//! 2. Capture placeholders `<FOUND1>`..`<FOUND9>` → `${1}`..`${9}`, replacement only.
//! 3. Numeric escapes `\uXXXX`, `\xXX`, `\UXXXXXXXX`, both modes.
//! 4. Named escapes `\N{NAME}`, both modes. An unknown name is the only failure.
//! 5. Control escapes `\t`, `\n`, `\r`, replacement only. In a pattern they stay
//!    escaped so the regex engine reads them itself.
//!
//! Anything that is not a recognized tag or escape passes through untouched.

use crate::error::{GrepsError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Which side of a search/replace pair is being normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Pattern,
    Replacement,
}

/// Menu grouping of a tag, used by shells to build "special characters" menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagGroup {
    Breaks,
    WhiteSpace,
    Dashes,
    Symbols,
    Brackets,
    Found,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: &'static str,
    pub literal: &'static str,
    pub label: &'static str,
    pub group: TagGroup,
    /// Offered in the search menu.
    pub search: bool,
    /// Offered in the replace menu.
    pub replace: bool,
}

const fn tag(
    tag: &'static str,
    literal: &'static str,
    label: &'static str,
    group: TagGroup,
    search: bool,
    replace: bool,
) -> TagEntry {
    TagEntry {
        tag,
        literal,
        label,
        group,
        search,
        replace,
    }
}

/// Substitution table, applied top to bottom.
pub const TAGS: &[TagEntry] = &[
    tag("<SPACE>", "\u{0020}", "Normal space", TagGroup::WhiteSpace, true, true),
    tag("<TAB>", "\u{0009}", "Tab", TagGroup::WhiteSpace, true, true),
    tag("<NBSP>", "\u{00a0}", "No break space", TagGroup::WhiteSpace, true, true),
    tag("<NARROW_NBSP>", "\u{202f}", "Narrow no break space", TagGroup::WhiteSpace, true, true),
    tag("<ENSPACE>", "\u{2002}", "En space", TagGroup::WhiteSpace, true, true),
    tag("<EMSPACE>", "\u{2003}", "Em space", TagGroup::WhiteSpace, true, true),
    tag("<THREE_PER_EM_SPACE>", "\u{2004}", "Three per em space", TagGroup::WhiteSpace, true, true),
    tag("<FOUR_PER_EM_SPACE>", "\u{2005}", "Four per em space", TagGroup::WhiteSpace, true, true),
    tag("<SIX_PER_EM_SPACE>", "\u{2006}", "Six per em space", TagGroup::WhiteSpace, true, true),
    tag("<FIGURESPACE>", "\u{2007}", "Figure space", TagGroup::WhiteSpace, true, true),
    tag("<PUNCTSPACE>", "\u{2008}", "Punctuation space", TagGroup::WhiteSpace, true, true),
    tag("<THINSPACE>", "\u{2009}", "Thin space", TagGroup::WhiteSpace, true, true),
    tag("<HAIRSPACE>", "\u{200a}", "Hair space", TagGroup::WhiteSpace, true, true),
    tag("<ZEROSPACE>", "\u{200b}", "Zero width space", TagGroup::WhiteSpace, true, true),
    tag("<ENDPARA>", "\u{000d}", "End of paragraph", TagGroup::Breaks, true, true),
    tag("<LINEBREAK>", "\u{2028}", "Line break", TagGroup::Breaks, true, true),
    tag("<COLUMNBREAK>", "\u{001a}", "Column break", TagGroup::Breaks, true, true),
    tag("<FRAMEBREAK>", "\u{001b}", "Frame break", TagGroup::Breaks, true, true),
    tag("<EMDASH>", "\u{2014}", "Em dash", TagGroup::Dashes, true, true),
    tag("<ENDASH>", "\u{2013}", "En dash", TagGroup::Dashes, true, true),
    tag("<NON_BREAKING_HYPHEN>", "\u{2011}", "Non-breaking hyphen", TagGroup::Dashes, true, true),
    tag("<BULLET>", "\u{2022}", "Bullet", TagGroup::Symbols, true, true),
    tag("<BACKSLASH>", "\\", "Backslash", TagGroup::Symbols, true, false),
    tag("<CARET>", "^", "Caret", TagGroup::Symbols, true, true),
    tag("<COPYRIGHT>", "\u{00a9}", "Copyright", TagGroup::Symbols, true, true),
    tag("<ELLIPSIS>", "\u{2026}", "Ellipsis", TagGroup::Symbols, true, true),
    tag("<REGTM>", "\u{00ae}", "Registered trademark", TagGroup::Symbols, true, true),
    tag("<TRADEMARK>", "\u{2122}", "Trademark", TagGroup::Symbols, true, true),
    tag("<LEFTPARENTHESIS>", "\\(", "Left parenthesis", TagGroup::Brackets, true, false),
    tag("<RIGHTPARENTHESIS>", "\\)", "Right parenthesis", TagGroup::Brackets, true, false),
    tag("<LEFT_SQUARE_BRACKET>", "\\[", "Left square bracket", TagGroup::Brackets, true, false),
    tag("<RIGHT_SQUARE_BRACKET>", "\\]", "Right square bracket", TagGroup::Brackets, true, false),
    tag("<LEFT_CURLY_BRACKET>", "\\{", "Left curly bracket", TagGroup::Brackets, true, false),
    tag("<RIGHT_CURLY_BRACKET>", "\\}", "Right curly bracket", TagGroup::Brackets, true, false),
];

/// Capture placeholders and the template syntax they expand to.
pub const FOUND_TAGS: &[TagEntry] = &[
    tag("<FOUND1>", "${1}", "Found 1", TagGroup::Found, false, true),
    tag("<FOUND2>", "${2}", "Found 2", TagGroup::Found, false, true),
    tag("<FOUND3>", "${3}", "Found 3", TagGroup::Found, false, true),
    tag("<FOUND4>", "${4}", "Found 4", TagGroup::Found, false, true),
    tag("<FOUND5>", "${5}", "Found 5", TagGroup::Found, false, true),
    tag("<FOUND6>", "${6}", "Found 6", TagGroup::Found, false, true),
    tag("<FOUND7>", "${7}", "Found 7", TagGroup::Found, false, true),
    tag("<FOUND8>", "${8}", "Found 8", TagGroup::Found, false, true),
    tag("<FOUND9>", "${9}", "Found 9", TagGroup::Found, false, true),
];

static UNICODE4_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\u([0-9A-Fa-f]{4})").unwrap());
static HEX2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\x([0-9A-Fa-f]{2})").unwrap());
static UNICODE8_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\U([0-9A-Fa-f]{8})").unwrap());
static NAMED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\N\{([^}]+)\}").unwrap());

pub fn normalize(text: &str, mode: Mode) -> Result<String> {
    if text.is_empty() {
        return Ok(String::new());
    }

    let mut out = apply_table(text, TAGS);
    if mode == Mode::Replacement {
        out = apply_table(&out, FOUND_TAGS);
    }

    for re in [&*UNICODE4_RE, &*HEX2_RE, &*UNICODE8_RE] {
        out = decode_hex_escapes(re, &out);
    }
    out = decode_named_escapes(&out)?;

    if mode == Mode::Replacement {
        out = out
            .replace("\\t", "\t")
            .replace("\\n", "\n")
            .replace("\\r", "\r");
    }

    Ok(out)
}

/// Tags a shell should offer for the given side of the dialog, in menu order.
pub fn catalogue(mode: Mode) -> Vec<&'static TagEntry> {
    match mode {
        Mode::Pattern => TAGS.iter().filter(|t| t.search).collect(),
        Mode::Replacement => TAGS
            .iter()
            .filter(|t| t.replace)
            .chain(FOUND_TAGS.iter())
            .collect(),
    }
}

fn apply_table(text: &str, table: &[TagEntry]) -> String {
    let mut out = text.to_string();
    for entry in table {
        if out.contains(entry.tag) {
            out = out.replace(entry.tag, entry.literal);
        }
    }
    out
}

fn decode_hex_escapes(re: &Regex, text: &str) -> String {
    re.replace_all(text, |caps: &Captures| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            // Surrogates and values past U+10FFFF stay as typed.
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

fn decode_named_escapes(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in NAMED_RE.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let c = unicode_names2::character(name.as_str())
            .ok_or_else(|| GrepsError::UnknownCodepointName(name.as_str().to_string()))?;
        out.push_str(&text[last..whole.start()]);
        out.push(c);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_escape_stays_escaped_in_patterns() {
        let pattern = normalize("a\\tb", Mode::Pattern).unwrap();
        assert_eq!(pattern, "a\\tb");

        let replacement = normalize("a\\tb", Mode::Replacement).unwrap();
        assert_eq!(replacement, "a\tb");
    }

    #[test]
    fn plain_text_is_a_fixed_point() {
        let text = "plain words, (groups)? [sets] and $ signs";
        let once = normalize(text, Mode::Pattern).unwrap();
        assert_eq!(once, text);
        assert_eq!(normalize(&once, Mode::Pattern).unwrap(), once);
    }

    #[test]
    fn symbolic_tags_become_literal_characters() {
        let out = normalize("a<NBSP>b<EMDASH>c<ENDPARA>", Mode::Pattern).unwrap();
        assert_eq!(out, "a\u{00a0}b\u{2014}c\r");
    }

    #[test]
    fn bracket_tags_become_regex_escapes() {
        let out = normalize("<LEFTPARENTHESIS>x<RIGHTPARENTHESIS>", Mode::Pattern).unwrap();
        assert_eq!(out, "\\(x\\)");
    }

    #[test]
    fn found_placeholders_only_expand_in_replacements() {
        assert_eq!(
            normalize("<FOUND2>-<FOUND1>", Mode::Replacement).unwrap(),
            "${2}-${1}"
        );
        assert_eq!(
            normalize("<FOUND1>", Mode::Pattern).unwrap(),
            "<FOUND1>"
        );
    }

    #[test]
    fn numeric_escapes_decode_in_both_modes() {
        assert_eq!(normalize("\\u00e9", Mode::Pattern).unwrap(), "é");
        assert_eq!(normalize("\\x41", Mode::Replacement).unwrap(), "A");
        assert_eq!(normalize("\\U0001F600", Mode::Pattern).unwrap(), "😀");
    }

    #[test]
    fn invalid_scalar_values_pass_through() {
        assert_eq!(normalize("\\uD800", Mode::Pattern).unwrap(), "\\uD800");
        assert_eq!(normalize("\\U00110000", Mode::Pattern).unwrap(), "\\U00110000");
    }

    #[test]
    fn earlier_passes_feed_later_ones() {
        // \u005C is a backslash, which turns the trailing "x41" into a \x escape.
        assert_eq!(normalize("\\u005Cx41", Mode::Pattern).unwrap(), "A");
    }

    #[test]
    fn named_escapes_resolve_by_unicode_name() {
        assert_eq!(
            normalize("\\N{EM DASH}", Mode::Replacement).unwrap(),
            "\u{2014}"
        );
    }

    #[test]
    fn unknown_names_fail() {
        let err = normalize("\\N{NOT A REAL CHARACTER}", Mode::Pattern).unwrap_err();
        match err {
            GrepsError::UnknownCodepointName(name) => assert_eq!(name, "NOT A REAL CHARACTER"),
            other => panic!("Expected UnknownCodepointName, got {:?}", other),
        }
    }

    #[test]
    fn unrecognized_tags_pass_through() {
        assert_eq!(
            normalize("<NOT_A_TAG> \\q", Mode::Replacement).unwrap(),
            "<NOT_A_TAG> \\q"
        );
    }

    #[test]
    fn catalogue_hides_regex_escapes_from_replace_menu() {
        let replace = catalogue(Mode::Replacement);
        assert!(replace.iter().all(|t| t.group != TagGroup::Brackets));
        assert!(replace.iter().any(|t| t.tag == "<FOUND9>"));

        let search = catalogue(Mode::Pattern);
        assert!(search.iter().any(|t| t.tag == "<BACKSLASH>"));
        assert!(search.iter().all(|t| t.group != TagGroup::Found));
    }
}
