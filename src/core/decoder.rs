//! Purpose: Recursive-descent JSON grammar over a `Cursor`, producing `Value` trees.
//! Exports: `Decoder`, `Values`.
//! Role: Value dispatch, container parsing, string scanning, and keyword matching.
//! Invariants: Rules that do not match return `Ok(None)`/`Ok(false)` and leave the cursor in place.
//! Invariants: Once a rule commits (opening token consumed), later failures are fatal errors.
//! Invariants: No state survives between decodes; each decoder owns only its cursor.
//! Notes: Dispatch order is object, array, string, keyword, number.
use std::collections::BTreeMap;
use std::iter::FusedIterator;

use tracing::trace;

use crate::core::cursor::Cursor;
use crate::core::error::{Error, ErrorKind};
use crate::core::number::parse_number;
use crate::core::unescape::unescape;
use crate::core::value::Value;

static KEYWORDS: [(&str, Value); 3] = [
    ("true", Value::Bool(true)),
    ("false", Value::Bool(false)),
    ("null", Value::Null),
];

/// A delimited sequence of members: objects and arrays share one parsing
/// algorithm and differ only in delimiters and member rule.
trait Container: Default + Into<Value> {
    const OPEN: u8;
    const CLOSE: u8;
    const NAME: &'static str;

    /// Parse one member into `self`. `Ok(false)` means no member starts here.
    fn parse_member<C: Cursor>(&mut self, decoder: &mut Decoder<C>) -> Result<bool, Error>;
}

impl Container for BTreeMap<String, Value> {
    const OPEN: u8 = b'{';
    const CLOSE: u8 = b'}';
    const NAME: &'static str = "object";

    fn parse_member<C: Cursor>(&mut self, decoder: &mut Decoder<C>) -> Result<bool, Error> {
        let Some(key) = decoder.parse_string()? else {
            return Ok(false);
        };
        if !decoder.skip(b':')? {
            return Err(Error::new(ErrorKind::ExpectingSeparator)
                .with_message(format!("expected ':' after object key {key:?}"))
                .with_offset(decoder.offset() as u64));
        }
        let value = decoder.require_value()?;
        self.insert(key, value);
        Ok(true)
    }
}

impl Container for Vec<Value> {
    const OPEN: u8 = b'[';
    const CLOSE: u8 = b']';
    const NAME: &'static str = "array";

    fn parse_member<C: Cursor>(&mut self, decoder: &mut Decoder<C>) -> Result<bool, Error> {
        match decoder.decode_value(true)? {
            Some(value) => {
                self.push(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Debug)]
pub struct Decoder<C> {
    cursor: C,
}

impl<C: Cursor> Decoder<C> {
    pub fn new(cursor: C) -> Self {
        Self { cursor }
    }

    /// Decode exactly one value plus the whitespace around it.
    ///
    /// With `tolerant` set, a position where no value starts yields
    /// `Ok(None)` instead of `IllegalValue`. Errors raised after a value
    /// has started (an unclosed array, a bad escape) are never suppressed.
    pub fn decode_value(&mut self, tolerant: bool) -> Result<Option<Value>, Error> {
        self.cursor.skip_whitespace()?;
        let value = self.dispatch()?;
        if value.is_none() && !tolerant {
            return Err(self.illegal_value());
        }
        self.cursor.skip_whitespace()?;
        Ok(value)
    }

    /// Decode a sequence of top-level values until input runs out.
    pub fn values(&mut self) -> Values<'_, C> {
        Values {
            decoder: self,
            done: false,
        }
    }

    /// True when nothing but whitespace remains.
    pub fn is_exhausted(&mut self) -> Result<bool, Error> {
        self.cursor.skip_whitespace()?;
        Ok(self.cursor.peek()?.is_none())
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    pub fn into_inner(self) -> C {
        self.cursor
    }

    fn dispatch(&mut self) -> Result<Option<Value>, Error> {
        if let Some(object) = self.parse_container::<BTreeMap<String, Value>>()? {
            return Ok(Some(object));
        }
        if let Some(array) = self.parse_container::<Vec<Value>>()? {
            return Ok(Some(array));
        }
        if let Some(text) = self.parse_string()? {
            return Ok(Some(Value::String(text)));
        }
        if let Some(keyword) = self.parse_keyword()? {
            return Ok(Some(keyword));
        }
        Ok(parse_number(&mut self.cursor)?.map(Value::Number))
    }

    fn require_value(&mut self) -> Result<Value, Error> {
        match self.decode_value(false)? {
            Some(value) => Ok(value),
            None => Err(self.illegal_value()),
        }
    }

    fn parse_container<T: Container>(&mut self) -> Result<Option<Value>, Error> {
        let start = self.offset();
        if !self.skip(T::OPEN)? {
            return Ok(None);
        }

        let mut container = T::default();
        let mut members = 0usize;
        let mut after_comma = false;
        while container.parse_member(self)? {
            members += 1;
            after_comma = self.skip(b',')?;
            if !after_comma {
                break;
            }
        }
        if after_comma {
            return Err(Error::new(ErrorKind::MissingMember)
                .with_message(format!("expected {} member after ','", T::NAME))
                .with_hint("Trailing commas are not allowed.")
                .with_offset(self.offset() as u64));
        }
        if !self.skip(T::CLOSE)? {
            return Err(Error::new(ErrorKind::UnclosedInstance)
                .with_message(format!(
                    "expected '{}' to close {} opened at offset {start}",
                    char::from(T::CLOSE),
                    T::NAME
                ))
                .with_offset(self.offset() as u64));
        }

        trace!(kind = T::NAME, members, start, "container closed");
        Ok(Some(container.into()))
    }

    // Raw extraction: a quote preceded by an odd run of backslashes is
    // escaped and scanning continues to the next quote.
    fn parse_string(&mut self) -> Result<Option<String>, Error> {
        let start = self.offset();
        if !self.cursor.scan(b'"')? {
            return Ok(None);
        }

        let mut raw = Vec::new();
        loop {
            let run_start = raw.len();
            if !self.cursor.read_until(b'"', &mut raw)? {
                return Err(Error::new(ErrorKind::UnclosedString)
                    .with_message("input ended before the closing '\"'")
                    .with_offset(start as u64));
            }
            let backslashes = raw[run_start..]
                .iter()
                .rev()
                .take_while(|&&byte| byte == b'\\')
                .count();
            if backslashes % 2 == 0 {
                break;
            }
            if let Some(last) = raw.last_mut() {
                *last = b'"';
            }
        }

        unescape(&raw)
            .map(Some)
            .map_err(|err| err.with_offset(start as u64))
    }

    fn parse_keyword(&mut self) -> Result<Option<Value>, Error> {
        let start = self.offset();
        let Some(first) = self.cursor.peek()? else {
            return Ok(None);
        };
        let Some((word, value)) = KEYWORDS.iter().find(|(word, _)| word.as_bytes()[0] == first)
        else {
            return Ok(None);
        };

        self.cursor.advance()?;
        for &expected in &word.as_bytes()[1..] {
            if !self.cursor.scan(expected)? {
                return Err(Error::new(ErrorKind::UnexpectedKeyword)
                    .with_message(format!("expected `{word}`"))
                    .with_offset(start as u64));
            }
        }
        Ok(Some(value.clone()))
    }

    // Delimiter match with whitespace trimmed on both sides.
    fn skip(&mut self, delim: u8) -> Result<bool, Error> {
        self.cursor.skip_whitespace()?;
        if self.cursor.scan(delim)? {
            self.cursor.skip_whitespace()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn illegal_value(&mut self) -> Error {
        let offset = self.offset() as u64;
        let found = match self.cursor.peek() {
            Ok(Some(byte)) => describe(byte),
            Ok(None) => "end of input".to_string(),
            Err(err) => return err,
        };
        Error::new(ErrorKind::IllegalValue)
            .with_message(format!("expected a JSON value, found {found}"))
            .with_offset(offset)
    }
}

fn describe(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", char::from(byte))
    } else {
        format!("byte 0x{byte:02X}")
    }
}

/// Iterator over whitespace-separated top-level values. Stops cleanly at
/// end of input and yields nothing after the first error.
#[derive(Debug)]
pub struct Values<'d, C> {
    decoder: &'d mut Decoder<C>,
    done: bool,
}

impl<C: Cursor> Iterator for Values<'_, C> {
    type Item = Result<Value, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.decode_value(true) {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                self.done = true;
                match self.decoder.is_exhausted() {
                    Ok(true) => None,
                    Ok(false) => Some(Err(self.decoder.illegal_value())),
                    Err(err) => Some(Err(err)),
                }
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<C: Cursor> FusedIterator for Values<'_, C> {}
