//! Tokenizer and parser for the Clarity markup language.
//!
//! # Scope
//!
//! This crate implements the first two stages of the compiler:
//! - **Tokenizer** - raw text to a flat token stream, with `INDENT`/`DEDENT`
//!   tokens derived from an indentation stack the way block-structured
//!   scripting languages do it
//!   - Strings, multiline strings, comments
//!   - Variable declarations and references
//!   - Element headers with their raw attribute text
//!   - `for` / `if` / `else` headers, component definitions and uses
//!
//! - **Parser** - single-token-lookahead recursive descent from tokens to a
//!   [`clarity_ast::Document`]
//!   - Blocks are delimited by `INDENT` ... `DEDENT`
//!   - Structural mistakes are recorded as [`ParseIssue`]s and parsing
//!     continues with the next statement
//!
//! Only the tokenizer can fail outright (see [`LexError`]).

/// Recursive-descent parser producing the syntax tree.
pub mod parser;
/// Tokenizer converting source text into tokens.
pub mod tokenizer;

pub use parser::{ParseIssue, Parser};
pub use tokenizer::{LexError, Token, TokenKind, Tokenizer};
