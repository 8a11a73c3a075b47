//! Tokenizer module.
//!
//! The tokenizer walks the source once, keeping an indentation stack that
//! starts at a single zero-width level. Leading whitespace at the start of
//! every non-blank, non-comment line is compared with the top of the stack
//! to produce `INDENT` and `DEDENT` tokens.

/// Tokenizer state and main loop.
pub mod core;
/// Fatal tokenizer errors.
pub mod error;
/// Cursor and scanning helpers.
pub mod helpers;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::Tokenizer;
pub use error::LexError;
pub use token::{Token, TokenKind};
