//! Line and token cursor for the MD5 text formats.
//!
//! Both `.md5mesh` and `.md5anim` are line-oriented: one directive or block
//! entry per line, tokens separated by spaces and tabs, names quoted (and
//! allowed to contain spaces), vectors wrapped in parentheses, `//`
//! starting a comment that runs to the end of the line. [`TextCursor`]
//! walks lines while tracking a 1-based line number for error reporting;
//! [`Tokens`] splits a single line on demand and converts tokens into the
//! numeric types the parsers need, producing typed errors instead of
//! undefined results on malformed input.

use glam::{Vec2, Vec3};
use memchr::memchr;

use crate::error::{Md5Error, Result};

/// Cursor over the lines of an MD5 text file
#[derive(Debug, Clone)]
pub struct TextCursor<'a> {
    text: &'a str,
    line_number: usize,
}

impl<'a> TextCursor<'a> {
    /// Creates a cursor at the start of `text`
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            line_number: 0,
        }
    }

    /// 1-based number of the most recently returned line
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the next line's tokens, or `None` at end of input
    pub fn next_line(&mut self) -> Option<Tokens<'a>> {
        if self.text.is_empty() {
            return None;
        }
        let line = match memchr(b'\n', self.text.as_bytes()) {
            Some(end) => {
                let line = &self.text[..end];
                self.text = &self.text[end + 1..];
                line
            }
            None => {
                let line = self.text;
                self.text = "";
                line
            }
        };
        self.line_number += 1;
        Some(Tokens::new(
            line.strip_suffix('\r').unwrap_or(line),
            self.line_number,
        ))
    }

    /// Like [`next_line`](Self::next_line), but running out of input while a
    /// block is still open is an error
    pub fn block_line(&mut self, block: &'static str) -> Result<Tokens<'a>> {
        let line = self.line_number;
        self.next_line()
            .ok_or(Md5Error::UnexpectedEof { block, line })
    }
}

/// Token reader over a single line
#[derive(Debug, Clone, Copy)]
pub struct Tokens<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str, number: usize) -> Self {
        Self {
            rest: line,
            line: number,
        }
    }

    /// 1-based number of the line this reader covers
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the next token, or `None` at end of line or at a `//` comment.
    ///
    /// Parentheses and braces are standalone single-character tokens; a
    /// quoted token is returned without its quotes and may contain spaces.
    pub fn next_token(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start_matches([' ', '\t']);
        if rest.is_empty() || rest.starts_with("//") {
            self.rest = "";
            return None;
        }
        let bytes = rest.as_bytes();
        let (token, consumed) = match bytes[0] {
            b'(' | b')' | b'{' | b'}' => (&rest[..1], 1),
            b'"' => match memchr(b'"', &bytes[1..]) {
                Some(end) => (&rest[1..=end], end + 2),
                None => (&rest[1..], rest.len()),
            },
            _ => {
                let end = bytes
                    .iter()
                    .position(|&b| matches!(b, b' ' | b'\t' | b'(' | b')' | b'{' | b'}' | b'"'))
                    .unwrap_or(rest.len());
                (&rest[..end], end)
            }
        };
        self.rest = &rest[consumed..];
        Some(token)
    }

    /// Next token without advancing
    pub fn peek_token(&self) -> Option<&'a str> {
        let mut probe = *self;
        probe.next_token()
    }

    /// Next token, or [`Md5Error::MissingToken`] at end of line
    pub fn expect_token(&mut self, context: &'static str) -> Result<&'a str> {
        self.next_token().ok_or(Md5Error::MissingToken {
            context,
            line: self.line,
        })
    }

    fn parse<T: std::str::FromStr>(token: &str, context: &'static str, line: usize) -> Result<T> {
        token.parse().map_err(|_| Md5Error::InvalidNumber {
            token: token.to_string(),
            context,
            line,
        })
    }

    /// Next token parsed as `f32`
    pub fn next_f32(&mut self, context: &'static str) -> Result<f32> {
        let token = self.expect_token(context)?;
        Self::parse(token, context, self.line)
    }

    /// Next token parsed as `f32`, or `None` at end of line
    pub fn next_f32_opt(&mut self, context: &'static str) -> Result<Option<f32>> {
        match self.next_token() {
            Some(token) => Self::parse(token, context, self.line).map(Some),
            None => Ok(None),
        }
    }

    /// Next token parsed as `i32`
    pub fn next_i32(&mut self, context: &'static str) -> Result<i32> {
        let token = self.expect_token(context)?;
        Self::parse(token, context, self.line)
    }

    /// Next token parsed as `u32`
    pub fn next_u32(&mut self, context: &'static str) -> Result<u32> {
        let token = self.expect_token(context)?;
        Self::parse(token, context, self.line)
    }

    /// Next token parsed as `usize`
    pub fn next_usize(&mut self, context: &'static str) -> Result<usize> {
        let token = self.expect_token(context)?;
        Self::parse(token, context, self.line)
    }

    /// Reads `( u v )`; the parentheses are optional
    pub fn vec2(&mut self, context: &'static str) -> Result<Vec2> {
        self.open_paren();
        let u = self.next_f32(context)?;
        let v = self.next_f32(context)?;
        self.close_paren();
        Ok(Vec2::new(u, v))
    }

    /// Reads `( x y z )`; the parentheses are optional
    pub fn vec3(&mut self, context: &'static str) -> Result<Vec3> {
        self.open_paren();
        let x = self.next_f32(context)?;
        let y = self.next_f32(context)?;
        let z = self.next_f32(context)?;
        self.close_paren();
        Ok(Vec3::new(x, y, z))
    }

    /// True if the line's first token is the block terminator `}`
    pub fn closes_block(&self) -> bool {
        self.peek_token() == Some("}")
    }

    fn open_paren(&mut self) {
        if self.peek_token() == Some("(") {
            self.next_token();
        }
    }

    fn close_paren(&mut self) {
        if self.peek_token() == Some(")") {
            self.next_token();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lines_and_counts_them() {
        let mut cursor = TextCursor::new("one\ntwo\r\nthree");
        assert_eq!(cursor.next_line().and_then(|mut l| l.next_token()), Some("one"));
        assert_eq!(cursor.next_line().and_then(|mut l| l.next_token()), Some("two"));
        assert_eq!(cursor.line_number(), 2);
        assert_eq!(cursor.next_line().and_then(|mut l| l.next_token()), Some("three"));
        assert!(cursor.next_line().is_none());
    }

    #[test]
    fn quoted_names_keep_spaces() {
        let mut cursor = TextCursor::new("\"Bip01 L Hand\" -1");
        let mut line = cursor.next_line().unwrap();
        assert_eq!(line.next_token(), Some("Bip01 L Hand"));
        assert_eq!(line.next_i32("parent").unwrap(), -1);
    }

    #[test]
    fn comments_end_the_line() {
        let mut cursor = TextCursor::new("\"origin\"\t-1 63 0\t// origin ( Tx Ty Tz )");
        let mut line = cursor.next_line().unwrap();
        assert_eq!(line.next_token(), Some("origin"));
        assert_eq!(line.next_i32("parent").unwrap(), -1);
        assert_eq!(line.next_u32("flags").unwrap(), 63);
        assert_eq!(line.next_usize("start index").unwrap(), 0);
        assert!(line.next_token().is_none());
    }

    #[test]
    fn parenthesized_groups() {
        let mut cursor = TextCursor::new("( 1.0 2.0 3.0 ) ( -0.5 0.0 0.5 )");
        let mut line = cursor.next_line().unwrap();
        assert_eq!(line.vec3("first").unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(line.vec3("second").unwrap(), Vec3::new(-0.5, 0.0, 0.5));
    }

    #[test]
    fn glued_parens_still_tokenize() {
        let mut cursor = TextCursor::new("(1.0 2.0 3.0)");
        let mut line = cursor.next_line().unwrap();
        assert_eq!(line.vec3("point").unwrap(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn bad_number_reports_token_and_line() {
        let mut cursor = TextCursor::new("first\nvert abc");
        cursor.next_line();
        let mut line = cursor.next_line().unwrap();
        line.next_token();
        match line.next_f32("vertex index") {
            Err(Md5Error::InvalidNumber { token, line, .. }) => {
                assert_eq!(token, "abc");
                assert_eq!(line, 2);
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn missing_token_at_end_of_line() {
        let mut cursor = TextCursor::new("numJoints");
        let mut line = cursor.next_line().unwrap();
        line.next_token();
        assert!(matches!(
            line.next_usize("numJoints"),
            Err(Md5Error::MissingToken { .. })
        ));
    }

    #[test]
    fn block_close_detection() {
        let mut cursor = TextCursor::new("}\n");
        let line = cursor.next_line().unwrap();
        assert!(line.closes_block());
    }

    #[test]
    fn eof_inside_block_is_an_error() {
        let mut cursor = TextCursor::new("joints {");
        cursor.next_line();
        assert!(matches!(
            cursor.block_line("joints"),
            Err(Md5Error::UnexpectedEof { block: "joints", .. })
        ));
    }
}
