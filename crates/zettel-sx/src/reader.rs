//! Reading s-expressions from text.
//!
//! The accepted notation is the one produced by `Display` for [`Object`]:
//! parenthesised lists with optional dotted tails, double-quoted strings,
//! decimal integers, and symbols. A `;` starts a comment up to the end of
//! the line.

use crate::sexpr::{ListBuilder, Object};
use thiserror::Error;

/// Errors that can occur while reading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEnd(usize),

    #[error("unexpected ')' at byte {0}")]
    UnexpectedClose(usize),

    #[error("unterminated string starting at byte {0}")]
    UnterminatedString(usize),

    #[error("invalid escape sequence '\\{ch}' at byte {pos}")]
    InvalidEscape { pos: usize, ch: char },

    #[error("misplaced '.' at byte {0}")]
    MisplacedDot(usize),

    #[error("integer out of range at byte {pos}: {text}")]
    IntegerOverflow { pos: usize, text: String },

    #[error("trailing input at byte {0}")]
    TrailingInput(usize),
}

/// Reads exactly one value. Surrounding whitespace and comments are ignored.
pub fn read(src: &str) -> Result<Object, ReadError> {
    let mut reader = Reader { src, pos: 0 };
    let obj = reader.read_form()?;
    reader.skip_blank();
    if reader.pos < src.len() {
        return Err(ReadError::TrailingInput(reader.pos));
    }
    Ok(obj)
}

/// Reads all values of the source, in order.
pub fn read_all(src: &str) -> Result<Vec<Object>, ReadError> {
    let mut reader = Reader { src, pos: 0 };
    let mut result = Vec::new();
    loop {
        reader.skip_blank();
        if reader.pos >= src.len() {
            return Ok(result);
        }
        match reader.read_form() {
            Ok(obj) => result.push(obj),
            Err(err) => {
                tracing::debug!(%err, forms = result.len(), "failed to read s-expression");
                return Err(err);
            }
        }
    }
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | ';')
}

impl Reader<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_blank(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ';' {
                while let Some(ch) = self.bump() {
                    if ch == '\n' {
                        break;
                    }
                }
            } else if ch.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn read_form(&mut self) -> Result<Object, ReadError> {
        self.skip_blank();
        match self.peek() {
            None => Err(ReadError::UnexpectedEnd(self.pos)),
            Some('(') => {
                self.bump();
                self.read_list()
            }
            Some(')') => Err(ReadError::UnexpectedClose(self.pos)),
            Some('"') => self.read_string(),
            Some(_) => {
                let start = self.pos;
                let token = self.read_token();
                if token == "." {
                    return Err(ReadError::MisplacedDot(start));
                }
                atom(token, start)
            }
        }
    }

    fn read_list(&mut self) -> Result<Object, ReadError> {
        let mut lb = ListBuilder::new();
        loop {
            self.skip_blank();
            match self.peek() {
                None => return Err(ReadError::UnexpectedEnd(self.pos)),
                Some(')') => {
                    self.bump();
                    return Ok(lb.list());
                }
                Some('.') if self.is_dot() => {
                    let dot = self.pos;
                    if lb.is_empty() {
                        return Err(ReadError::MisplacedDot(dot));
                    }
                    self.bump();
                    let last = self.read_form()?;
                    self.skip_blank();
                    if self.bump() != Some(')') {
                        return Err(ReadError::MisplacedDot(dot));
                    }
                    lb.set_tail(last);
                    return Ok(lb.list());
                }
                Some(_) => {
                    let obj = self.read_form()?;
                    lb.add(obj);
                }
            }
        }
    }

    /// A lone `.` followed by a delimiter or the end of input.
    fn is_dot(&self) -> bool {
        let mut rest = self.src[self.pos..].chars();
        rest.next();
        rest.next().is_none_or(is_delimiter)
    }

    fn read_token(&mut self) -> &str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if is_delimiter(ch) {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn read_string(&mut self) -> Result<Object, ReadError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(ReadError::UnterminatedString(start)),
                Some('"') => return Ok(Object::String(value)),
                Some('\\') => {
                    let pos = self.pos;
                    match self.bump() {
                        None => return Err(ReadError::UnterminatedString(start)),
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some(ch) => return Err(ReadError::InvalidEscape { pos, ch }),
                    }
                }
                Some(ch) => value.push(ch),
            }
        }
    }
}

fn atom(token: &str, pos: usize) -> Result<Object, ReadError> {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return token
            .parse::<i64>()
            .map(Object::Int)
            .map_err(|_| ReadError::IntegerOverflow {
                pos,
                text: token.to_string(),
            });
    }
    Ok(Object::symbol(token))
}
