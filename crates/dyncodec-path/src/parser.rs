//! Dotted path parser.
//!
//! Grammar:
//!
//! ```text
//! path     := "" | head ("." key index*)*
//! head     := key index* | index+
//! key      := (plain | "\" reserved)+
//! index    := "[" digits "]"
//! reserved := "\" | "." | "[" | "]"
//! ```

use thiserror::Error;

use crate::types::Segment;
use crate::util::{is_escapable, is_valid_index};

/// Malformed path text. Parsing fails fast: no partial path is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathSyntaxError {
    #[error("unexpected character {ch:?} at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("empty key at offset {pos}")]
    EmptyKey { pos: usize },
    #[error("invalid index at offset {pos}")]
    InvalidIndex { pos: usize },
    #[error("invalid escape sequence at offset {pos}")]
    InvalidEscape { pos: usize },
}

/// Path parser over a borrowed input string.
pub(crate) struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    /// Parse `input` into its segments.
    pub(crate) fn parse(input: &'a str) -> Result<Vec<Segment>, PathSyntaxError> {
        let mut parser = Self { input, pos: 0 };
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<Vec<Segment>, PathSyntaxError> {
        let mut segments = Vec::new();
        if self.is_at_end() {
            return Ok(segments);
        }

        if self.peek() == Some('[') {
            segments.push(self.parse_index()?);
        } else {
            segments.push(self.parse_key()?);
        }
        self.parse_indices(&mut segments)?;

        while let Some(c) = self.peek() {
            if c != '.' {
                return Err(PathSyntaxError::UnexpectedChar { ch: c, pos: self.pos });
            }
            self.advance();
            segments.push(self.parse_key()?);
            self.parse_indices(&mut segments)?;
        }

        Ok(segments)
    }

    fn parse_indices(&mut self, segments: &mut Vec<Segment>) -> Result<(), PathSyntaxError> {
        while self.peek() == Some('[') {
            segments.push(self.parse_index()?);
        }
        Ok(())
    }

    fn parse_key(&mut self) -> Result<Segment, PathSyntaxError> {
        let start = self.pos;
        let mut key = String::new();

        while let Some(c) = self.peek() {
            match c {
                '.' | '[' => break,
                ']' => return Err(PathSyntaxError::UnexpectedChar { ch: c, pos: self.pos }),
                '\\' => {
                    let escape_pos = self.pos;
                    self.advance();
                    match self.peek() {
                        Some(escaped) if is_escapable(escaped) => {
                            key.push(escaped);
                            self.advance();
                        }
                        Some(_) => return Err(PathSyntaxError::InvalidEscape { pos: escape_pos }),
                        None => return Err(PathSyntaxError::UnexpectedEnd),
                    }
                }
                _ => {
                    key.push(c);
                    self.advance();
                }
            }
        }

        if key.is_empty() {
            return Err(PathSyntaxError::EmptyKey { pos: start });
        }
        Ok(Segment::Key(key))
    }

    fn parse_index(&mut self) -> Result<Segment, PathSyntaxError> {
        self.expect('[')?;
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let digits = &self.input[start..self.pos];
        if !is_valid_index(digits) {
            return Err(PathSyntaxError::InvalidIndex { pos: start });
        }
        let index = digits
            .parse::<usize>()
            .map_err(|_| PathSyntaxError::InvalidIndex { pos: start })?;

        self.expect(']')?;
        Ok(Segment::Index(index))
    }

    fn expect(&mut self, expected: char) -> Result<(), PathSyntaxError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(PathSyntaxError::UnexpectedChar { ch: c, pos: self.pos }),
            None => Err(PathSyntaxError::UnexpectedEnd),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}
