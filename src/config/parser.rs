//! Single-pass parser for the pipeline DSL.
//!
//! ```text
//! config        := item*
//! item          := path_decl | step
//! path_decl     := "/" pathchars ":"
//! step          := word [ "{" settings "}" ]
//! settings      := pair ( "," pair )*
//! pair          := word ":" word
//! word          := quoted_string | bare_string
//! ```
//!
//! Quoted strings have no escape sequences, so a value can never contain a
//! literal `"`. Whitespace between tokens is skipped, except that a path's
//! `:` and a step's `{` must follow the word directly. Whitespace inside
//! quotes is kept verbatim. The first error aborts the whole parse.

use crate::error::{SyntaxError, SyntaxErrorKind};

use super::model::{RoutingTable, Settings, Step, ROOT_PATH};

const fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b',' | b'{' | b'}' | b':')
}

pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub fn parse(mut self) -> Result<RoutingTable, SyntaxError> {
        let mut table = RoutingTable::new();
        let mut current_path = ROOT_PATH.to_string();

        loop {
            self.skip_space();
            if self.peek().is_none() {
                break;
            }

            let word = self.read_word()?;

            if word.starts_with('/') {
                if self.peek() != Some(b':') {
                    return Err(self.error(SyntaxErrorKind::MissingPathColon {
                        path: word.to_string(),
                    }));
                }
                self.advance();
                current_path = word.to_string();
                continue;
            }

            let settings = if self.peek() == Some(b'{') {
                Some(self.parse_settings()?)
            } else {
                None
            };

            table.entry(current_path.clone()).or_default().push(Step {
                name: word.to_string(),
                settings,
            });
        }

        Ok(table)
    }

    /// Parse a `{ key: value, ... }` block starting at the cursor.
    pub fn parse_settings(&mut self) -> Result<Settings, SyntaxError> {
        self.expect(b'{', "'{'")?;
        let mut settings = Settings::new();

        loop {
            self.skip_space();
            let key = self.read_word()?;
            self.skip_space();
            self.expect(b':', "':'")?;
            self.skip_space();
            let value = self.read_word()?;
            settings.insert(key.to_string(), value.to_string());

            self.skip_space();
            match self.peek() {
                Some(b'}') => {
                    self.advance();
                    return Ok(settings);
                }
                Some(b',') => self.advance(),
                Some(found) => {
                    return Err(self.error(SyntaxErrorKind::Unexpected {
                        found,
                        expected: "',' or '}'",
                    }))
                }
                None => {
                    return Err(self.error(SyntaxErrorKind::UnexpectedEof {
                        expected: "',' or '}'",
                    }))
                }
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError {
            offset: self.pos + 1,
            kind,
        }
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(found) if found == byte => {
                self.advance();
                Ok(())
            }
            Some(found) => Err(self.error(SyntaxErrorKind::Unexpected { found, expected })),
            None => Err(self.error(SyntaxErrorKind::UnexpectedEof { expected })),
        }
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.advance();
        }
    }

    fn read_word(&mut self) -> Result<&'a str, SyntaxError> {
        match self.peek() {
            None => Err(self.error(SyntaxErrorKind::UnexpectedEof { expected: "word" })),
            Some(b'"') => self.read_quoted_string(),
            Some(found) if is_delimiter(found) => Err(self.error(SyntaxErrorKind::Unexpected {
                found,
                expected: "word",
            })),
            Some(_) => Ok(self.read_bare_string()),
        }
    }

    fn read_quoted_string(&mut self) -> Result<&'a str, SyntaxError> {
        self.expect(b'"', "'\"'")?;
        let start = self.pos;

        match self.input.as_bytes()[start..].iter().position(|&b| b == b'"') {
            Some(len) => {
                self.pos = start + len + 1;
                Ok(&self.input[start..start + len])
            }
            None => {
                self.pos = self.input.len();
                Err(self.error(SyntaxErrorKind::UnterminatedString))
            }
        }
    }

    fn read_bare_string(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || is_delimiter(b) {
                break;
            }
            self.advance();
        }
        &self.input[start..self.pos]
    }
}
