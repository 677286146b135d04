// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reader for the textual type syntax:
//!
//! ```text
//! type       := annotation* ( "?" | name ( "<" type ( "," type )* ">" )? )
//! annotation := "@" name ( "(" ( value ( "," value )* )? ")" )?
//! value      := ( name | json-string ) "=" json
//! name       := (letter | "_" | "$") (alphanumeric | "_" | "$" | ".")*
//! ```
//!
//! `json` is any JSON value, so `@Size(max = 32, pattern = "[a-z]+")` reads
//! back what `Display` writes.

use alloc::format;
use alloc::string::String as StdString;
use alloc::vec::Vec;

use super::{Annotation, TypeError, TypeRef};

pub(crate) fn parse_type(input: &str) -> Result<TypeRef, TypeError> {
    let mut parser = TypeParser { input, pos: 0 };
    let ty = parser.parse_type()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(ty),
        Some(c) => Err(parser.error(&format!("unexpected `{c}` after type"))),
    }
}

/// Whether `text` can be written unquoted where the grammar expects a name.
pub(crate) fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.'))
}

struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn peek(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, message: &str) -> TypeError {
        TypeError::Parse {
            input: self.input.into(),
            position: self.pos,
            message: message.into(),
        }
    }

    fn name(&mut self) -> Result<&'a str, TypeError> {
        self.skip_whitespace();
        let input = self.input;
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
                self.bump();
            }
            Some(c) => return Err(self.error(&format!("expected a type name, found `{c}`"))),
            None => return Err(self.error("expected a type name, found end of input")),
        }
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || matches!(c, '_' | '$' | '.'))
        {
            self.bump();
        }
        Ok(&input[start..self.pos])
    }

    fn annotation(&mut self) -> Result<Annotation, TypeError> {
        let mut annotation = Annotation::new(self.name()?);
        self.skip_whitespace();
        if self.peek() != Some('(') {
            return Ok(annotation);
        }
        self.bump();
        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(annotation);
        }

        loop {
            self.skip_whitespace();
            let key: StdString = if self.peek() == Some('"') {
                self.quoted_key()?
            } else {
                self.name()?.into()
            };
            self.skip_whitespace();
            if self.peek() != Some('=') {
                return Err(self.error(&format!("expected `=` after annotation key `{key}`")));
            }
            self.bump();
            let value = self.json_value()?;
            annotation = annotation.with_value(key, value);
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') => {
                    self.bump();
                    return Ok(annotation);
                }
                Some(c) => {
                    return Err(self.error(&format!("expected `,` or `)`, found `{c}`")));
                }
                None => return Err(self.error("unterminated annotation value list")),
            }
        }
    }

    fn quoted_key(&mut self) -> Result<StdString, TypeError> {
        let input = self.input;
        let start = self.pos;
        self.bump();
        let mut escaped = false;
        loop {
            match self.bump() {
                Some(_) if escaped => escaped = false,
                Some('\\') => escaped = true,
                Some('"') => break,
                Some(_) => {}
                None => {
                    self.pos = start;
                    return Err(self.error("unterminated annotation key"));
                }
            }
        }
        serde_json::from_str(&input[start..self.pos]).map_err(|err| TypeError::Parse {
            input: input.into(),
            position: start,
            message: format!("invalid annotation key: {err}").into(),
        })
    }

    /// Scan one JSON value up to the next top-level `,` or `)`.
    fn json_value(&mut self) -> Result<serde_json::Value, TypeError> {
        self.skip_whitespace();
        let input = self.input;
        let start = self.pos;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        while let Some(c) = self.peek() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
            } else {
                match c {
                    '"' => in_string = true,
                    '[' | '{' => depth += 1,
                    ']' | '}' if depth > 0 => depth -= 1,
                    ',' | ')' if depth == 0 => break,
                    _ => {}
                }
            }
            self.bump();
        }

        let text = input[start..self.pos].trim_end();
        if text.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.error(&format!("expected an annotation value, found `{c}`")),
                None => self.error("expected an annotation value, found end of input"),
            });
        }
        serde_json::from_str(text).map_err(|err| TypeError::Parse {
            input: input.into(),
            position: start,
            message: format!("invalid annotation value `{text}`: {err}").into(),
        })
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeError> {
        let mut annotations = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() != Some('@') {
                break;
            }
            self.bump();
            annotations.push(self.annotation()?);
        }

        self.skip_whitespace();
        if self.peek() == Some('?') {
            self.bump();
            return Ok(TypeRef::wildcard().with_annotations(annotations));
        }

        let name = self.name()?;
        let mut params = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some('<') {
            self.bump();
            loop {
                params.push(self.parse_type()?);
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => {
                        self.bump();
                    }
                    Some('>') => {
                        self.bump();
                        break;
                    }
                    Some(c) => {
                        return Err(self.error(&format!("expected `,` or `>`, found `{c}`")));
                    }
                    None => return Err(self.error("unterminated type parameter list")),
                }
            }
        }

        Ok(TypeRef::generic(name, params).with_annotations(annotations))
    }
}
