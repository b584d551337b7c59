//! Token source for assembly text.
//!
//! Splits source into whitespace/comma-delimited tokens, tagging each with
//! its 1-indexed line. Comments start at `;` or `//` and run to end of line.
//! The iterator is lazy and borrows from the source; it cannot be rewound.

use std::iter::Enumerate;
use std::str::Lines;

/// A single token with the line it appeared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token text, exactly as written.
    pub text: &'a str,
    /// 1-indexed source line.
    pub line: usize,
}

impl<'a> Token<'a> {
    /// Creates a token.
    #[must_use]
    pub const fn new(text: &'a str, line: usize) -> Self {
        Self { text, line }
    }
}

/// Lazy iterator over the tokens of a source text.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    lines: Enumerate<Lines<'a>>,
    rest: &'a str,
    line: usize,
}

impl<'a> Tokens<'a> {
    /// Creates a token iterator over `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate(),
            rest: "",
            line: 0,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(text) = next_in_line(&mut self.rest) {
                return Some(Token::new(text, self.line));
            }
            let (idx, line) = self.lines.next()?;
            self.line = idx + 1;
            self.rest = strip_comment(line);
        }
    }
}

const fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn strip_comment(line: &str) -> &str {
    let semicolon = line.find(';');
    let slashes = line.find("//");
    match (semicolon, slashes) {
        (Some(a), Some(b)) => &line[..a.min(b)],
        (Some(pos), None) | (None, Some(pos)) => &line[..pos],
        (None, None) => line,
    }
}

fn next_in_line<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start_matches(is_separator);
    if trimmed.is_empty() {
        *rest = "";
        return None;
    }
    let end = trimmed.find(is_separator).unwrap_or(trimmed.len());
    let (token, remainder) = trimmed.split_at(end);
    *rest = remainder;
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &str) -> Vec<(&str, usize)> {
        Tokens::new(source).map(|t| (t.text, t.line)).collect()
    }

    #[test]
    fn empty_source_has_no_tokens() {
        assert!(collect("").is_empty());
        assert!(collect("\n\n   \n").is_empty());
    }

    #[test]
    fn tokens_carry_line_numbers() {
        assert_eq!(
            collect("load v1 0x10\nadd v1 5"),
            vec![
                ("load", 1),
                ("v1", 1),
                ("0x10", 1),
                ("add", 2),
                ("v1", 2),
                ("5", 2)
            ]
        );
    }

    #[test]
    fn commas_separate_operands() {
        assert_eq!(
            collect("skre v1,v2\nmove v3 , v4"),
            vec![
                ("skre", 1),
                ("v1", 1),
                ("v2", 1),
                ("move", 2),
                ("v3", 2),
                ("v4", 2)
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            collect("; header\nclr ; clear screen\n// note\nrts // done"),
            vec![("clr", 2), ("rts", 4)]
        );
    }

    #[test]
    fn earliest_comment_marker_wins() {
        assert_eq!(collect("clr // a ; b"), vec![("clr", 1)]);
        assert_eq!(collect("clr ; a // b"), vec![("clr", 1)]);
    }

    #[test]
    fn label_colon_stays_attached() {
        assert_eq!(
            collect("loop: jump loop"),
            vec![("loop:", 1), ("jump", 1), ("loop", 1)]
        );
    }

    #[test]
    fn tabs_and_crlf_are_whitespace() {
        assert_eq!(
            collect("\tclr\r\n\trts\r\n"),
            vec![("clr", 1), ("rts", 2)]
        );
    }
}
