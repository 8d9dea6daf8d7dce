use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{all_consuming, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::{ByteArray, Compound, IntArray, List, LongArray, Tag, TagType};

/// Deepest nesting of lists, arrays and compounds the parser accepts.
pub(crate) const MAX_DEPTH: usize = 256;

pub(crate) fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

fn bare(input: &str) -> IResult<&str, &str> {
    take_while1(is_bare_char)(input)
}

// An optionally signed run of digits.
fn integer_literal(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(one_of("+-")), digit1))(input)
}

fn float_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

/// What a bare token means.
#[derive(Debug, PartialEq)]
pub(crate) enum Classified {
    Value(Tag),
    /// An integer literal that does not fit its kind.
    OutOfRange(TagType),
    Text,
}

fn special_float(body: &str) -> Option<f64> {
    match body {
        "NaN" => Some(f64::NAN),
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

/// Decide what a bare token is: boolean, integer, float or plain text.
pub(crate) fn classify(token: &str) -> Classified {
    match token {
        "true" => return Classified::Value(Tag::Byte(1)),
        "false" => return Classified::Value(Tag::Byte(0)),
        _ => {}
    }

    let (body, suffix) = match token.char_indices().last() {
        Some((i, c @ ('f' | 'F' | 'd' | 'D'))) => (&token[..i], Some(c)),
        _ => (token, None),
    };
    if let Some(v) = special_float(body) {
        return Classified::Value(match suffix {
            Some('f' | 'F') => Tag::Float(v as f32),
            _ => Tag::Double(v),
        });
    }
    if let Some(v) = special_float(token) {
        return Classified::Value(Tag::Double(v));
    }

    if let Ok((_, (digits, suffix))) =
        all_consuming(pair(integer_literal, opt(one_of("bBsSlL"))))(token)
    {
        return match suffix {
            Some('b' | 'B') => digits
                .parse()
                .map(|v| Classified::Value(Tag::Byte(v)))
                .unwrap_or(Classified::OutOfRange(TagType::Byte)),
            Some('s' | 'S') => digits
                .parse()
                .map(|v| Classified::Value(Tag::Short(v)))
                .unwrap_or(Classified::OutOfRange(TagType::Short)),
            Some(_) => digits
                .parse()
                .map(|v| Classified::Value(Tag::Long(v)))
                .unwrap_or(Classified::OutOfRange(TagType::Long)),
            None => digits
                .parse()
                .map(|v| Classified::Value(Tag::Int(v)))
                .unwrap_or(Classified::OutOfRange(TagType::Int)),
        };
    }

    if let Ok((_, (literal, suffix))) =
        all_consuming(pair(float_literal, opt(one_of("fFdD"))))(token)
    {
        return match suffix {
            Some('f' | 'F') => literal
                .parse()
                .map(|v| Classified::Value(Tag::Float(v)))
                .unwrap_or(Classified::Text),
            _ => literal
                .parse()
                .map(|v| Classified::Value(Tag::Double(v)))
                .unwrap_or(Classified::Text),
        };
    }

    Classified::Text
}

/// Whether a string can be printed without quotes and read back as the same
/// string.
pub(crate) fn is_bare_string(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_bare_char) && classify(s) == Classified::Text
}

/// Recursive descent over the whole input, using nom for the tokens.
pub(crate) struct Parser<'a> {
    input: &'a str,
    rest: &'a str,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            rest: input,
            depth: 0,
        }
    }

    /// Byte offset of the next unparsed character.
    pub(crate) fn position(&self) -> usize {
        self.input.len() - self.rest.len()
    }

    fn error(&self, msg: impl std::fmt::Display) -> Error {
        Error::syntax(self.position(), msg)
    }

    fn error_at(&self, rest: &str, msg: impl std::fmt::Display) -> Error {
        Error::syntax(self.input.len() - rest.len(), msg)
    }

    pub(crate) fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    pub(crate) fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.rest.starts_with(c) {
            self.rest = &self.rest[c.len_utf8()..];
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        self.skip_whitespace();
        if self.eat(c) {
            Ok(())
        } else {
            match self.peek() {
                Some(found) => Err(self.error(format!("expected '{}', found '{}'", c, found))),
                None => Err(self.error(format!("expected '{}', found end of input", c))),
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {}", MAX_DEPTH)));
        }
        Ok(())
    }

    /// Parse one value, or `Tag::End` if there is nothing but whitespace.
    pub(crate) fn document(&mut self) -> Result<Tag> {
        self.skip_whitespace();
        if self.at_end() {
            return Ok(Tag::End);
        }
        self.value()
    }

    fn value(&mut self) -> Result<Tag> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => {
                self.enter()?;
                let compound = self.compound()?;
                self.depth -= 1;
                Ok(Tag::Compound(compound))
            }
            Some('[') => {
                self.enter()?;
                let tag = self.list_or_array()?;
                self.depth -= 1;
                Ok(tag)
            }
            Some('"' | '\'') => Ok(Tag::String(self.quoted()?)),
            Some(_) => self.scalar(),
            None => Err(self.error("expected value, found end of input")),
        }
    }

    fn scalar(&mut self) -> Result<Tag> {
        let start = self.rest;
        let (rest, token) = bare(self.rest).map_err(|_| match self.peek() {
            Some(c) => self.error(format!("unexpected character '{}'", c)),
            None => self.error("expected value, found end of input"),
        })?;
        self.rest = rest;

        match classify(token) {
            Classified::Value(tag) => Ok(tag),
            Classified::OutOfRange(kind) => {
                Err(self.error_at(start, format!("{} out of range for {}", token, kind)))
            }
            Classified::Text => Ok(Tag::String(token.to_owned())),
        }
    }

    fn quoted(&mut self) -> Result<String> {
        let start = self.rest;
        let mut chars = self.rest.char_indices();
        let quote = match chars.next() {
            Some((_, c @ ('"' | '\''))) => c,
            _ => return Err(self.error("expected quoted string")),
        };

        let mut out = String::new();
        while let Some((i, c)) = chars.next() {
            if c == quote {
                self.rest = &start[i + c.len_utf8()..];
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }

            let escape_at = &start[i..];
            let (_, e) = chars
                .next()
                .ok_or_else(|| self.error_at(start, "unterminated string"))?;
            match e {
                '\\' | '"' | '\'' => out.push(e),
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'x' | 'u' | 'U' => {
                    let digits = match e {
                        'x' => 2,
                        'u' => 4,
                        _ => 8,
                    };
                    let mut code = 0u32;
                    for _ in 0..digits {
                        let d = chars
                            .next()
                            .and_then(|(_, h)| h.to_digit(16))
                            .ok_or_else(|| self.error_at(escape_at, "invalid hex escape"))?;
                        code = code * 16 + d;
                    }
                    let c = char::from_u32(code)
                        .ok_or_else(|| self.error_at(escape_at, "escape is not a unicode scalar value"))?;
                    out.push(c);
                }
                other => {
                    return Err(self.error_at(escape_at, format!("unknown escape '\\{}'", other)))
                }
            }
        }

        Err(self.error_at(start, "unterminated string"))
    }

    fn key(&mut self) -> Result<String> {
        self.skip_whitespace();
        match self.peek() {
            Some('"' | '\'') => self.quoted(),
            _ => {
                let (rest, key) = bare(self.rest).map_err(|_| self.error("expected key"))?;
                self.rest = rest;
                Ok(key.to_owned())
            }
        }
    }

    fn compound(&mut self) -> Result<Compound> {
        self.expect('{')?;
        let mut compound = Compound::new();

        self.skip_whitespace();
        if self.eat('}') {
            return Ok(compound);
        }

        loop {
            let key = self.key()?;
            self.expect(':')?;
            let value = self.value()?;
            compound.insert(key, value)?;

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                return Ok(compound);
            }
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected ',' or '}}', found '{}'", c)),
                None => self.error("unbalanced '{': found end of input"),
            });
        }
    }

    fn list_or_array(&mut self) -> Result<Tag> {
        self.expect('[')?;
        for (prefix, kind) in [
            ("B;", TagType::ByteArray),
            ("I;", TagType::IntArray),
            ("L;", TagType::LongArray),
        ] {
            if let Some(rest) = self.rest.strip_prefix(prefix) {
                self.rest = rest;
                return self.array(kind);
            }
        }
        self.list().map(Tag::List)
    }

    fn list(&mut self) -> Result<List> {
        let mut list = List::new();

        self.skip_whitespace();
        if self.eat(']') {
            return Ok(list);
        }

        loop {
            self.skip_whitespace();
            let at = self.rest;
            let value = self.value()?;
            list.push(value)
                .map_err(|e| self.error_at(at, e))?;

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                return Ok(list);
            }
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected ',' or ']', found '{}'", c)),
                None => self.error("unbalanced '[': found end of input"),
            });
        }
    }

    fn array(&mut self, kind: TagType) -> Result<Tag> {
        let mut bytes = Vec::new();
        let mut ints = Vec::new();
        let mut longs = Vec::new();

        self.skip_whitespace();
        if !self.eat(']') {
            loop {
                self.skip_whitespace();
                let at = self.rest;
                let element = self.scalar()?;
                let mismatch = || {
                    self.error_at(
                        at,
                        format!("{} element in {}", element.tag_type(), kind),
                    )
                };
                match (kind, &element) {
                    (TagType::ByteArray, Tag::Byte(v)) => bytes.push(*v),
                    (TagType::ByteArray, Tag::Int(v)) => {
                        bytes.push(i8::try_from(*v).map_err(|_| mismatch())?)
                    }
                    (TagType::IntArray, Tag::Int(v)) => ints.push(*v),
                    (TagType::LongArray, Tag::Long(v)) => longs.push(*v),
                    (TagType::LongArray, Tag::Int(v)) => longs.push(*v as i64),
                    _ => return Err(mismatch()),
                }

                self.skip_whitespace();
                if self.eat(',') {
                    continue;
                }
                if self.eat(']') {
                    break;
                }
                return Err(match self.peek() {
                    Some(c) => self.error(format!("expected ',' or ']', found '{}'", c)),
                    None => self.error("unbalanced '[': found end of input"),
                });
            }
        }

        Ok(match kind {
            TagType::ByteArray => Tag::ByteArray(ByteArray::new(bytes)),
            TagType::IntArray => Tag::IntArray(IntArray::new(ints)),
            _ => Tag::LongArray(LongArray::new(longs)),
        })
    }
}
