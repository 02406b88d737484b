//! Purpose: Top-level decode entry points over text, bytes, and streams.
//! Exports: `Source`, `decode`, `from_str`, `from_slice`, `from_reader`.
//! Role: Wraps the input in the matching cursor and runs the value rule once.
//! Invariants: `decode` returns `Ok(None)` only when `tolerant` is set.
//! Invariants: Content after the decoded value is left unread and is not an error.
use std::fmt;
use std::io::Read;

use tracing::debug;

use crate::core::cursor::{Cursor, ReaderCursor, SliceCursor};
use crate::core::decoder::Decoder;
use crate::core::error::Error;
use crate::core::value::Value;

/// Where a document comes from.
pub enum Source<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
    Stream(&'a mut dyn Read),
}

impl<'a> Source<'a> {
    pub fn stream(reader: &'a mut dyn Read) -> Self {
        Source::Stream(reader)
    }

    fn label(&self) -> &'static str {
        match self {
            Source::Text(_) => "text",
            Source::Bytes(_) => "bytes",
            Source::Stream(_) => "stream",
        }
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Source::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Source::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(text: &'a str) -> Self {
        Source::Text(text)
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(text: &'a String) -> Self {
        Source::Text(text.as_str())
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Source::Bytes(bytes)
    }
}

/// Decode one JSON value from `source`.
///
/// In tolerant mode an input where no value starts yields `Ok(None)`;
/// otherwise that case is an `IllegalValue` error.
pub fn decode<'a>(source: impl Into<Source<'a>>, tolerant: bool) -> Result<Option<Value>, Error> {
    let source = source.into();
    let label = source.label();
    debug!(source = label, tolerant, "decode started");
    match source {
        Source::Text(text) => run(SliceCursor::from(text), label, tolerant),
        Source::Bytes(bytes) => run(SliceCursor::new(bytes), label, tolerant),
        Source::Stream(reader) => run(ReaderCursor::new(reader), label, tolerant),
    }
}

pub fn from_str(text: &str) -> Result<Value, Error> {
    required(decode(text, false))
}

pub fn from_slice(bytes: &[u8]) -> Result<Value, Error> {
    required(decode(bytes, false))
}

pub fn from_reader<R: Read>(mut reader: R) -> Result<Value, Error> {
    required(decode(Source::stream(&mut reader), false))
}

fn run<C: Cursor>(cursor: C, label: &str, tolerant: bool) -> Result<Option<Value>, Error> {
    let mut decoder = Decoder::new(cursor);
    let result = decoder.decode_value(tolerant);
    match &result {
        Ok(value) => debug!(
            source = label,
            offset = decoder.offset(),
            kind = value.as_ref().map_or("none", |value| value.kind()),
            "decode finished"
        ),
        Err(err) => debug!(source = label, error = %err, "decode failed"),
    }
    result
}

// Non-tolerant decodes always produce a value or an error.
fn required(result: Result<Option<Value>, Error>) -> Result<Value, Error> {
    result.map(Option::unwrap_or_default)
}
