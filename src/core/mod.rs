// Core modules implementing the cursor, grammar rules, value model, and errors.
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod number;
pub mod unescape;
pub mod value;
