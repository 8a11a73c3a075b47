//! Helper methods for the tokenizer.
//!
//! This module contains the cursor primitives used throughout the main loop:
//! - Input/character handling (peek, advance, remaining input)
//! - Lookahead predicates for keywords and declarations
//! - Scanning to the structural colon of a header line
//! - Token emission

use clarity_common::text::{QUOTE_CHARS, TRIPLE_QUOTES, is_identifier_char};

use super::core::Tokenizer;
use super::token::{Token, TokenKind};

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl Tokenizer {
    /// The unconsumed part of the input.
    pub(super) fn rest(&self) -> &str {
        &self.input[self.current_pos..]
    }

    /// True once every character has been consumed.
    pub(super) fn at_end(&self) -> bool {
        self.current_pos >= self.input.len()
    }

    /// The character under the cursor.
    pub(super) fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume one character, keeping line and column in step.
    pub(super) fn advance(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.current_pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume `count` characters.
    pub(super) fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Consume characters while `predicate` holds.
    pub(super) fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.current_char().is_some_and(&predicate) {
            let _ = self.advance();
        }
    }

    /// Consume spaces, tabs and other non-newline whitespace.
    pub(super) fn skip_inline_whitespace(&mut self) {
        self.advance_while(is_inline_whitespace);
    }
}

// =============================================================================
// Lookahead Helpers
// =============================================================================

impl Tokenizer {
    /// The triple-quote delimiter under the cursor, if any.
    pub(super) fn triple_quote_here(&self) -> Option<&'static str> {
        let rest = self.rest();
        TRIPLE_QUOTES
            .iter()
            .copied()
            .find(|delimiter| rest.starts_with(*delimiter))
    }

    /// `$name =` (spaces allowed before the `=`).
    pub(super) fn is_variable_declaration(&self) -> bool {
        let Some(after_sigil) = self.rest().strip_prefix('$') else {
            return false;
        };
        after_sigil
            .trim_start_matches(is_identifier_char)
            .trim_start_matches(is_inline_whitespace)
            .starts_with('=')
    }

    /// `@component` followed by something that cannot continue a name.
    pub(super) fn is_component_definition(&self) -> bool {
        self.rest()
            .strip_prefix("@component")
            .is_some_and(|after| !after.starts_with(is_name_char))
    }

    /// `keyword` followed by a space or tab, e.g. `for ` or `if `.
    pub(super) fn keyword_followed_by_blank(&self, keyword: &str) -> bool {
        self.rest()
            .strip_prefix(keyword)
            .is_some_and(|after| after.starts_with([' ', '\t']))
    }

    /// `keyword` not followed by a name character (end of input counts).
    pub(super) fn keyword_at_boundary(&self, keyword: &str) -> bool {
        self.rest()
            .strip_prefix(keyword)
            .is_some_and(|after| !after.starts_with(is_name_char))
    }

    /// First character after the cursor that is not inline whitespace.
    pub(super) fn next_non_blank(&self) -> Option<char> {
        self.rest().chars().find(|c| !is_inline_whitespace(*c))
    }
}

// =============================================================================
// Scanning Helpers
// =============================================================================

impl Tokenizer {
    /// Advance to the first `:` outside quotes, or to the end of the line.
    ///
    /// The cursor is left on the colon (or newline), which is not consumed.
    pub(super) fn scan_to_structural_colon(&mut self) {
        let mut quote: Option<char> = None;
        while let Some(c) = self.current_char() {
            match (c, quote) {
                ('\n', _) | (':', None) => break,
                (q, None) if QUOTE_CHARS.contains(&q) => quote = Some(q),
                (q, Some(open)) if q == open => quote = None,
                _ => {}
            }
            let _ = self.advance();
        }
    }

    /// Advance to the end of the line or to a `#` outside quotes.
    pub(super) fn scan_to_line_end_or_comment(&mut self) {
        let mut quote: Option<char> = None;
        while let Some(c) = self.current_char() {
            match (c, quote) {
                ('\n', _) | ('#', None) => break,
                (q, None) if QUOTE_CHARS.contains(&q) => quote = Some(q),
                (q, Some(open)) if q == open => quote = None,
                _ => {}
            }
            let _ = self.advance();
        }
    }

    /// Source text between a byte offset and the cursor.
    pub(super) fn slice_from(&self, start: usize) -> &str {
        &self.input[start..self.current_pos]
    }
}

// =============================================================================
// Token Emission
// =============================================================================

impl Tokenizer {
    /// Append a token to the output stream.
    pub(super) fn emit(&mut self, kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) {
        self.token_stream.push(Token::new(kind, lexeme, line, column));
    }
}

/// Whitespace other than the newline, which is structural.
pub(super) fn is_inline_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\n'
}

/// Characters allowed in element names after the first one.
pub(super) fn is_name_char(c: char) -> bool {
    is_identifier_char(c) || c == '-'
}
