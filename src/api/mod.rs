//! Purpose: Define the stable public Rust API boundary for jsonwalk.
//! Exports: Decode entry points, the value model, cursors, and errors.
//! Role: Public, additive-only surface; callers should not reach into `core` paths.
//! Invariants: Every decode entry point is stateless across calls.
//! Invariants: Internal helper modules stay private.

mod source;

pub use crate::core::cursor::{Cursor, ReaderCursor, SliceCursor};
pub use crate::core::decoder::{Decoder, Values};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::value::Value;
pub use source::{Source, decode, from_reader, from_slice, from_str};
