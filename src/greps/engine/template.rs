//! Replacement templates.
//!
//! `$1` and `${1}` insert a numbered group, `$name` and `${name}` a named one,
//! `$$` a literal dollar. A `$` that does not start a reference is literal.
//! References are resolved against the pattern when the template is parsed,
//! so a bad reference is reported before any text is touched.

use super::pattern::CompiledPattern;
use crate::error::{GrepsError, Result};
use fancy_regex::Captures;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    pub fn parse(template: &str, pattern: &CompiledPattern) -> Result<Self> {
        let bytes = template.as_bytes();
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'$' {
                let next = template[i..]
                    .find('$')
                    .map_or(template.len(), |offset| i + offset);
                literal.push_str(&template[i..next]);
                i = next;
                continue;
            }

            let reference = match bytes.get(i + 1) {
                Some(b'$') => {
                    literal.push('$');
                    i += 2;
                    continue;
                }
                Some(b'{') => template[i + 2..]
                    .find('}')
                    .map(|close| (&template[i + 2..i + 2 + close], i + 3 + close))
                    .filter(|(name, _)| !name.is_empty()),
                Some(b) if is_name_byte(*b) => {
                    let len = bytes[i + 1..]
                        .iter()
                        .take_while(|b| is_name_byte(**b))
                        .count();
                    Some((&template[i + 1..i + 1 + len], i + 1 + len))
                }
                _ => None,
            };

            match reference {
                Some((name, next)) => {
                    let index = resolve(name, pattern)?;
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(Piece::Group(index));
                    i = next;
                }
                None => {
                    literal.push('$');
                    i += 1;
                }
            }
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self { pieces })
    }

    /// Expands the template for one match. Groups that did not take part in
    /// the match expand to nothing.
    pub fn expand(&self, caps: &Captures<'_>) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Group(index) => {
                    if let Some(m) = caps.get(*index) {
                        out.push_str(m.as_str());
                    }
                }
            }
        }
        out
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn resolve(name: &str, pattern: &CompiledPattern) -> Result<usize> {
    if name.bytes().all(|b| b.is_ascii_digit()) {
        return name
            .parse::<usize>()
            .ok()
            .filter(|index| *index < pattern.captures_len())
            .ok_or_else(|| {
                GrepsError::Expansion(format!(
                    "invalid group reference {} (pattern has {} groups)",
                    name,
                    pattern.captures_len().saturating_sub(1)
                ))
            });
    }
    pattern
        .group_index(name)
        .ok_or_else(|| GrepsError::Expansion(format!("unknown group name {}", name)))
}
