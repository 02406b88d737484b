//! Purpose: Recursive-descent JSON decoder producing dynamic `Value` trees.
//! Exports: `api` (public surface), `core` (cursor, grammar, value model, errors).
//! Role: Library backing the `jsonwalk` CLI and any caller loading schema-less JSON.
//! Invariants: Decoding holds no process-wide state; concurrent decodes need no coordination.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;

pub use api::{Error, ErrorKind, Source, Value, decode, from_reader, from_slice, from_str};
