//! Common utilities for the Clarity compiler.
//!
//! This crate provides shared infrastructure used by every compiler stage:
//! - **Warning System** - the non-fatal diagnostics channel with colored
//!   terminal output
//! - **Text Helpers** - quote stripping and `$name` substitution shared by
//!   the parser and the generator

pub mod text;
pub mod warning;
