//! Purpose: Single fatal-error channel for decode failures and CLI plumbing.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Every rule in the decoder reports failures through this type.
//! Invariants: Kinds name the failing condition, not the rule that noticed it.
//! Invariants: Context (message, hint, offset, source) is additive and optional.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// No value production matched and tolerant mode was off.
    IllegalValue,
    /// A comma inside a container was not followed by a member.
    MissingMember,
    /// A container's closing delimiter was not found.
    UnclosedInstance,
    /// An object key was not followed by a colon.
    ExpectingSeparator,
    /// Input ended inside a quoted string.
    UnclosedString,
    /// A `\u` escape was short, malformed, or not a scalar value.
    InvalidUnicodeEscape,
    /// A `true`/`false`/`null` prefix did not complete.
    UnexpectedKeyword,
    /// Decoded string bytes were not UTF-8.
    InvalidUtf8,
    Io,
    Usage,
    NotFound,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    offset: Option<u64>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            offset: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " (offset: {offset})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Usage => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Io => 8,
        ErrorKind::IllegalValue
        | ErrorKind::MissingMember
        | ErrorKind::UnclosedInstance
        | ErrorKind::ExpectingSeparator
        | ErrorKind::UnclosedString
        | ErrorKind::InvalidUnicodeEscape
        | ErrorKind::UnexpectedKeyword
        | ErrorKind::InvalidUtf8 => 7,
    }
}
