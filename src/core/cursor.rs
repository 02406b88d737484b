//! Purpose: Forward-moving read head over in-memory buffers and byte streams.
//! Exports: `Cursor`, `SliceCursor`, `ReaderCursor`, `is_whitespace`.
//! Role: Leaf input layer beneath the decoder; owns no document data.
//! Invariants: `offset()` counts consumed bytes and moves back only through `unread`.
//! Invariants: `unread` only ever receives bytes that were the most recent ones consumed.
//! Notes: Works on bytes; JSON structure is ASCII so multi-byte UTF-8 passes through untouched.
use std::io::{self, BufRead, BufReader, Read};

use crate::core::error::{Error, ErrorKind};

/// JSON insignificant whitespace: space, tab, line feed, carriage return.
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

pub trait Cursor {
    /// Next unconsumed byte, or `None` at end of input.
    fn peek(&mut self) -> Result<Option<u8>, Error>;

    /// Consume and return the next byte.
    fn advance(&mut self) -> Result<Option<u8>, Error>;

    fn offset(&self) -> usize;

    /// Give back bytes that were just consumed, oldest first.
    fn unread(&mut self, bytes: &[u8]);

    /// Consume `byte` if it is next.
    fn scan(&mut self, byte: u8) -> Result<bool, Error> {
        if self.peek()? == Some(byte) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn skip_whitespace(&mut self) -> Result<(), Error> {
        while let Some(byte) = self.peek()? {
            if !is_whitespace(byte) {
                break;
            }
            self.advance()?;
        }
        Ok(())
    }

    /// Append bytes up to and consuming `delim`. Returns `false` when input
    /// ends first; the delimiter itself is never appended.
    fn read_until(&mut self, delim: u8, buf: &mut Vec<u8>) -> Result<bool, Error> {
        while let Some(byte) = self.advance()? {
            if byte == delim {
                return Ok(true);
            }
            buf.push(byte);
        }
        Ok(false)
    }
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn peek(&mut self) -> Result<Option<u8>, Error> {
        (**self).peek()
    }

    fn advance(&mut self) -> Result<Option<u8>, Error> {
        (**self).advance()
    }

    fn offset(&self) -> usize {
        (**self).offset()
    }

    fn unread(&mut self, bytes: &[u8]) {
        (**self).unread(bytes)
    }

    fn read_until(&mut self, delim: u8, buf: &mut Vec<u8>) -> Result<bool, Error> {
        (**self).read_until(delim, buf)
    }
}

/// Cursor over a fixed buffer with random-access positioning.
#[derive(Clone, Debug)]
pub struct SliceCursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> SliceCursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the read head; positions past the end clamp to the end.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Unconsumed remainder of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }
}

impl<'a> From<&'a str> for SliceCursor<'a> {
    fn from(input: &'a str) -> Self {
        Self::new(input.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for SliceCursor<'a> {
    fn from(input: &'a [u8]) -> Self {
        Self::new(input)
    }
}

impl Cursor for SliceCursor<'_> {
    fn peek(&mut self) -> Result<Option<u8>, Error> {
        Ok(self.input.get(self.pos).copied())
    }

    fn advance(&mut self) -> Result<Option<u8>, Error> {
        let next = self.input.get(self.pos).copied();
        if next.is_some() {
            self.pos += 1;
        }
        Ok(next)
    }

    fn offset(&self) -> usize {
        self.pos
    }

    fn unread(&mut self, bytes: &[u8]) {
        debug_assert!(self.input[..self.pos].ends_with(bytes));
        self.seek(self.pos.saturating_sub(bytes.len()));
    }

    fn read_until(&mut self, delim: u8, buf: &mut Vec<u8>) -> Result<bool, Error> {
        let rest = self.rest();
        match rest.iter().position(|&byte| byte == delim) {
            Some(idx) => {
                buf.extend_from_slice(&rest[..idx]);
                self.pos += idx + 1;
                Ok(true)
            }
            None => {
                buf.extend_from_slice(rest);
                self.pos = self.input.len();
                Ok(false)
            }
        }
    }
}

/// Cursor over any `Read`, buffered internally. Bytes handed back through
/// `unread` are replayed before the reader is consulted again.
#[derive(Debug)]
pub struct ReaderCursor<R> {
    inner: BufReader<R>,
    pending: Vec<u8>,
    offset: usize,
}

impl<R: Read> ReaderCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
            pending: Vec::new(),
            offset: 0,
        }
    }

    /// Unwrap the reader. Buffered but unconsumed bytes are lost.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn fill(&mut self) -> Result<Option<u8>, Error> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(io_error(err, self.offset)),
            }
        }
    }
}

impl<R: Read> Cursor for ReaderCursor<R> {
    fn peek(&mut self) -> Result<Option<u8>, Error> {
        if let Some(&byte) = self.pending.last() {
            return Ok(Some(byte));
        }
        self.fill()
    }

    fn advance(&mut self) -> Result<Option<u8>, Error> {
        if let Some(byte) = self.pending.pop() {
            self.offset += 1;
            return Ok(Some(byte));
        }
        let next = self.fill()?;
        if next.is_some() {
            self.inner.consume(1);
            self.offset += 1;
        }
        Ok(next)
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn unread(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().rev());
        self.offset = self.offset.saturating_sub(bytes.len());
    }

    fn read_until(&mut self, delim: u8, buf: &mut Vec<u8>) -> Result<bool, Error> {
        while let Some(byte) = self.pending.pop() {
            self.offset += 1;
            if byte == delim {
                return Ok(true);
            }
            buf.push(byte);
        }

        let start = buf.len();
        let read = self
            .inner
            .read_until(delim, buf)
            .map_err(|err| io_error(err, self.offset))?;
        self.offset += read;
        if buf.len() > start && buf.last() == Some(&delim) {
            buf.pop();
            return Ok(true);
        }
        Ok(false)
    }
}

fn io_error(err: io::Error, offset: usize) -> Error {
    Error::new(ErrorKind::Io)
        .with_message("failed to read input")
        .with_offset(offset as u64)
        .with_source(err)
}

#[cfg(test)]
mod tests {
    use super::{Cursor, ReaderCursor, SliceCursor};
    use crate::core::error::ErrorKind;
    use std::io::{self, Read};

    // Yields one byte per read and fails with `Interrupted` once up front.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        interrupted: bool,
    }

    impl Trickle {
        fn new(data: &str) -> Self {
            Self {
                data: data.as_bytes().to_vec(),
                pos: 0,
                interrupted: false,
            }
        }
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            if self.pos >= self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("boom"))
        }
    }

    #[test]
    fn slice_cursor_peeks_without_consuming() {
        let mut cursor = SliceCursor::from("ab");
        assert_eq!(cursor.peek().unwrap(), Some(b'a'));
        assert_eq!(cursor.peek().unwrap(), Some(b'a'));
        assert_eq!(cursor.advance().unwrap(), Some(b'a'));
        assert_eq!(cursor.advance().unwrap(), Some(b'b'));
        assert_eq!(cursor.advance().unwrap(), None);
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn skip_whitespace_stops_at_content() {
        let mut cursor = SliceCursor::from(" \t\r\n x");
        cursor.skip_whitespace().unwrap();
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.peek().unwrap(), Some(b'x'));
    }

    #[test]
    fn skip_whitespace_leaves_form_feed() {
        let mut cursor = SliceCursor::from("\u{c}1");
        cursor.skip_whitespace().unwrap();
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn seek_clamps_to_end() {
        let mut cursor = SliceCursor::from("abc");
        cursor.seek(10);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.peek().unwrap(), None);
        cursor.rewind();
        assert_eq!(cursor.rest(), b"abc");
    }

    #[test]
    fn slice_unread_rewinds() {
        let mut cursor = SliceCursor::from("1e+x");
        for _ in 0..3 {
            cursor.advance().unwrap();
        }
        cursor.unread(b"e+");
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.peek().unwrap(), Some(b'e'));
    }

    #[test]
    fn slice_read_until_reports_missing_delimiter() {
        let mut cursor = SliceCursor::from("ab\"cd");
        let mut buf = Vec::new();
        assert!(cursor.read_until(b'"', &mut buf).unwrap());
        assert_eq!(buf, b"ab");
        buf.clear();
        assert!(!cursor.read_until(b'"', &mut buf).unwrap());
        assert_eq!(buf, b"cd");
        assert_eq!(cursor.offset(), 5);
    }

    #[test]
    fn reader_cursor_handles_trickling_input() {
        let mut cursor = ReaderCursor::new(Trickle::new("  [1]"));
        cursor.skip_whitespace().unwrap();
        assert_eq!(cursor.offset(), 2);
        assert!(cursor.scan(b'[').unwrap());
        assert!(!cursor.scan(b']').unwrap());
        assert_eq!(cursor.advance().unwrap(), Some(b'1'));
        assert_eq!(cursor.advance().unwrap(), Some(b']'));
        assert_eq!(cursor.advance().unwrap(), None);
    }

    #[test]
    fn reader_unread_replays_in_order() {
        let mut cursor = ReaderCursor::new("12e-z".as_bytes());
        let consumed: Vec<u8> = (0..4).map(|_| cursor.advance().unwrap().unwrap()).collect();
        assert_eq!(consumed, b"12e-");
        cursor.unread(b"e-");
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.advance().unwrap(), Some(b'e'));
        assert_eq!(cursor.advance().unwrap(), Some(b'-'));
        assert_eq!(cursor.advance().unwrap(), Some(b'z'));
    }

    #[test]
    fn reader_read_until_drains_pending_first() {
        let mut cursor = ReaderCursor::new("ab\"c\"".as_bytes());
        cursor.advance().unwrap();
        cursor.unread(b"a");
        let mut buf = Vec::new();
        assert!(cursor.read_until(b'"', &mut buf).unwrap());
        assert_eq!(buf, b"ab");
        assert_eq!(cursor.offset(), 3);
        buf.clear();
        assert!(cursor.read_until(b'"', &mut buf).unwrap());
        assert_eq!(buf, b"c");
        buf.clear();
        assert!(!cursor.read_until(b'"', &mut buf).unwrap());
        assert!(buf.is_empty());
    }

    #[test]
    fn reader_errors_surface_as_io() {
        let mut cursor = ReaderCursor::new(Broken);
        let err = cursor.peek().expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.offset(), Some(0));
    }
}
