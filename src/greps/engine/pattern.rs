use crate::error::{GrepsError, Result};
use fancy_regex::{Captures, Regex};
use std::sync::Arc;
use tracing::debug;

/// A compiled, normalized pattern.
///
/// Cloning shares the underlying program. Searches started at an offset still
/// see the text before it, so lookbehind and `^` behave as they would on the
/// whole container.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Arc<Regex>,
}

impl CompiledPattern {
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// First match starting at or after `pos`, as a byte range.
    pub fn find_from(&self, text: &str, pos: usize) -> Result<Option<(usize, usize)>> {
        self.regex
            .find_from_pos(text, pos)
            .map(|m| m.map(|m| (m.start(), m.end())))
            .map_err(|e| GrepsError::MatchFailed(e.to_string()))
    }

    /// All non-overlapping matches in `text`, with their groups.
    pub fn captures_all<'t>(&self, text: &'t str) -> Result<Vec<Captures<'t>>> {
        self.regex
            .captures_iter(text)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| GrepsError::MatchFailed(e.to_string()))
    }

    /// Number of groups, counting the implicit whole-match group 0.
    pub fn captures_len(&self) -> usize {
        self.regex.captures_len()
    }

    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.regex
            .capture_names()
            .position(|group| group == Some(name))
    }

    pub fn ptr_eq(&self, other: &CompiledPattern) -> bool {
        Arc::ptr_eq(&self.regex, &other.regex)
    }
}

/// Compiles normalized pattern text, keeping the last result so that stepping
/// through matches with an unchanged pattern does not recompile.
#[derive(Debug, Default)]
pub struct PatternCompiler {
    cached: Option<CompiledPattern>,
}

impl PatternCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(&mut self, pattern: &str) -> Result<CompiledPattern> {
        if let Some(cached) = &self.cached {
            if cached.as_str() == pattern {
                return Ok(cached.clone());
            }
        }

        debug!(pattern, "compiling pattern");
        let regex = Regex::new(pattern).map_err(|e| GrepsError::Compile(e.to_string()))?;
        let compiled = CompiledPattern {
            regex: Arc::new(regex),
        };
        self.cached = Some(compiled.clone());
        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_reuses_the_compiled_program() {
        let mut compiler = PatternCompiler::new();
        let a = compiler.compile("fo+").unwrap();
        let b = compiler.compile("fo+").unwrap();
        assert!(a.ptr_eq(&b));

        let c = compiler.compile("ba+r").unwrap();
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn malformed_patterns_fail_to_compile() {
        let mut compiler = PatternCompiler::new();
        let err = compiler.compile("(unclosed").unwrap_err();
        assert!(matches!(err, GrepsError::Compile(_)));
    }

    #[test]
    fn a_failed_compile_keeps_the_previous_cache() {
        let mut compiler = PatternCompiler::new();
        let a = compiler.compile("x").unwrap();
        assert!(compiler.compile("[").is_err());
        let b = compiler.compile("x").unwrap();
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn find_from_sees_preceding_text() {
        let mut compiler = PatternCompiler::new();
        let pattern = compiler.compile(r"(?<=a)b").unwrap();
        assert_eq!(pattern.find_from("abab", 1).unwrap(), Some((1, 2)));
        assert_eq!(pattern.find_from("abab", 2).unwrap(), Some((3, 4)));

        let anchored = compiler.compile("^b").unwrap();
        assert_eq!(anchored.find_from("ab", 1).unwrap(), None);
    }

    #[test]
    fn backreferences_are_supported() {
        let mut compiler = PatternCompiler::new();
        let pattern = compiler.compile(r"(\w)\1").unwrap();
        assert_eq!(pattern.find_from("abccd", 0).unwrap(), Some((2, 4)));
    }

    #[test]
    fn named_groups_resolve_to_indexes() {
        let mut compiler = PatternCompiler::new();
        let pattern = compiler.compile(r"(?P<first>\w+) (?P<second>\w+)").unwrap();
        assert_eq!(pattern.captures_len(), 3);
        assert_eq!(pattern.group_index("second"), Some(2));
        assert_eq!(pattern.group_index("third"), None);
    }
}
