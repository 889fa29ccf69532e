//! Syntax highlighting for Ruby HDL source.
//!
//! The grammar is a flat list of rules tried in order at each position of a
//! line; the first rule matching *at* that position produces a token and the
//! scan continues after it. Characters no rule matches are left plain.

use crate::error::{OrcError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TokenKind {
    Comment,
    Keyword,
    String,
    Atom,
    Number,
}

/// A highlighted byte range within one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub range: Range<usize>,
    pub kind: TokenKind,
}

const RULES: &[(&str, TokenKind)] = &[
    (r"#.*", TokenKind::Comment),
    (r"VAR|INCLUDE|IF|THEN|ELSE|IN|END|LET", TokenKind::Keyword),
    (r"\$[a-zA-Z]*", TokenKind::Keyword),
    (r#"".*""#, TokenKind::String),
    (r"`[^`]*`", TokenKind::Atom),
    (r"<[^>]*>", TokenKind::Number),
    (r"\b[0-9]+\b", TokenKind::Number),
];

/// Compiled highlighting grammar.
#[derive(Debug, Clone)]
pub struct Highlighter {
    rules: Vec<(Regex, TokenKind)>,
}

impl Highlighter {
    pub fn new() -> Result<Self> {
        let rules = RULES
            .iter()
            .map(|(pattern, kind)| {
                Regex::new(pattern)
                    .map(|re| (re, *kind))
                    .map_err(|e| OrcError::internal(format!("invalid highlight rule {pattern}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Tokenizes a single line (without its trailing newline).
    pub fn highlight_line(&self, line: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut pos = 0;

        while pos < line.len() {
            match self.match_at(line, pos) {
                Some(span) => {
                    pos = span.range.end.max(pos + 1);
                    spans.push(span);
                }
                None => {
                    pos += line[pos..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        spans
    }

    fn match_at(&self, line: &str, pos: usize) -> Option<Span> {
        self.rules.iter().find_map(|(re, kind)| {
            re.find_at(line, pos)
                .filter(|m| m.start() == pos && !m.as_str().is_empty())
                .map(|m| Span {
                    range: m.range(),
                    kind: *kind,
                })
        })
    }
}
