use clarity_common::text::{QUOTE_CHARS, is_identifier_char};

use super::error::LexError;
use super::helpers::{is_inline_whitespace, is_name_char};
use super::token::{Token, TokenKind};

/// Turns Clarity source into a flat token stream.
///
/// # Example
/// ```
/// use clarity_syntax::{TokenKind, Tokenizer};
///
/// let mut tokenizer = Tokenizer::new("div:\n  \"Hi\"\n");
/// tokenizer.run().unwrap();
/// let kinds: Vec<TokenKind> = tokenizer.into_tokens().iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::Element,
///         TokenKind::Colon,
///         TokenKind::Newline,
///         TokenKind::Indent,
///         TokenKind::String,
///         TokenKind::Newline,
///         TokenKind::Dedent,
///         TokenKind::Eof,
///     ]
/// );
/// ```
pub struct Tokenizer {
    pub(super) input: String,
    /// Byte offset of the cursor into `input`.
    pub(super) current_pos: usize,
    pub(super) line: usize,
    pub(super) column: usize,
    /// Widths of the open indentation levels; the bottom entry is always 0.
    pub(super) indent_stack: Vec<usize>,
    pub(super) token_stream: Vec<Token>,
}

impl Tokenizer {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            current_pos: 0,
            line: 1,
            column: 1,
            indent_stack: vec![0],
            token_stream: Vec::new(),
        }
    }

    /// Tokenize `input` in one call.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for unterminated strings and inconsistent
    /// indentation.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
        let mut tokenizer = Self::new(input);
        tokenizer.run()?;
        Ok(tokenizer.into_tokens())
    }

    /// Consume the tokenizer and return the tokens produced by [`Self::run`].
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Tokenize the whole input.
    ///
    /// At end of input one `DEDENT` is emitted per open indentation level,
    /// followed by `EOF`, so `INDENT` and `DEDENT` counts always balance.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for unterminated strings and inconsistent
    /// indentation. Tokens produced before the error are kept.
    pub fn run(&mut self) -> Result<(), LexError> {
        let mut at_line_start = true;

        while !self.at_end() {
            if at_line_start {
                at_line_start = false;
                self.handle_indentation()?;
                if self.at_end() {
                    break;
                }
            }

            let Some(c) = self.current_char() else {
                break;
            };

            if let Some(delimiter) = self.triple_quote_here() {
                self.tokenize_multiline_string(delimiter)?;
            } else if c == '#' {
                self.tokenize_comment();
            } else if QUOTE_CHARS.contains(&c) {
                self.tokenize_string(c)?;
            } else if c == '$' {
                if self.is_variable_declaration() {
                    self.tokenize_variable_declaration();
                } else {
                    self.tokenize_variable_reference();
                }
            } else if c == ':' {
                self.emit(TokenKind::Colon, ":", self.line, self.column);
                let _ = self.advance();
            } else if c == '@' {
                if self.is_component_definition() {
                    self.tokenize_component_definition();
                } else {
                    self.tokenize_component_use();
                }
            } else if c == '\n' {
                self.emit(TokenKind::Newline, "\n", self.line, self.column);
                let _ = self.advance();
                at_line_start = true;
            } else if self.keyword_followed_by_blank("for") {
                self.tokenize_header(TokenKind::ForLoop);
            } else if self.keyword_followed_by_blank("if") {
                self.tokenize_header(TokenKind::IfStatement);
            } else if self.keyword_at_boundary("else") {
                self.tokenize_else();
            } else if c.is_alphabetic() || c == '_' {
                self.tokenize_element_or_content();
            } else {
                // Stray characters between tokens carry no meaning.
                let _ = self.advance();
            }
        }

        while self.indent_stack.len() > 1 {
            let _ = self.indent_stack.pop();
            self.emit(TokenKind::Dedent, "", self.line, self.column);
        }
        self.emit(TokenKind::Eof, "", self.line, self.column);
        Ok(())
    }

    /// Measure leading whitespace and emit `INDENT`/`DEDENT` tokens.
    ///
    /// Blank lines, comment-only lines and trailing whitespace at the end of
    /// input leave the stack untouched.
    fn handle_indentation(&mut self) -> Result<(), LexError> {
        let mut width = 0;
        while self.current_char().is_some_and(is_inline_whitespace) {
            width += 1;
            let _ = self.advance();
        }

        if matches!(self.current_char(), None | Some('\n' | '#')) {
            return Ok(());
        }

        let current = self.indent_stack.last().copied().unwrap_or(0);
        if width > current {
            self.indent_stack.push(width);
            self.emit(TokenKind::Indent, " ".repeat(width), self.line, 1);
        } else if width < current {
            while self.indent_stack.last().is_some_and(|&top| width < top) {
                let _ = self.indent_stack.pop();
                self.emit(TokenKind::Dedent, "", self.line, 1);
            }
            if self.indent_stack.last() != Some(&width) {
                return Err(LexError::InconsistentIndentation { line: self.line });
            }
        }
        Ok(())
    }

    fn tokenize_comment(&mut self) {
        let (start, line, column) = (self.current_pos, self.line, self.column);
        self.advance_while(|c| c != '\n');
        let lexeme = self.slice_from(start).to_string();
        self.emit(TokenKind::Comment, lexeme, line, column);
    }

    fn tokenize_multiline_string(&mut self, delimiter: &'static str) -> Result<(), LexError> {
        let (start, line, column) = (self.current_pos, self.line, self.column);
        self.advance_by(delimiter.len());

        loop {
            if self.rest().starts_with(delimiter) {
                self.advance_by(delimiter.len());
                let lexeme = self.slice_from(start).to_string();
                self.emit(TokenKind::MultilineString, lexeme, line, column);
                return Ok(());
            }
            if self.advance().is_none() {
                return Err(LexError::UnterminatedMultilineString { line });
            }
        }
    }

    /// A quoted string, closed by the first matching quote that is not
    /// preceded by a backslash.
    fn tokenize_string(&mut self, quote: char) -> Result<(), LexError> {
        let (start, line, column) = (self.current_pos, self.line, self.column);
        let _ = self.advance();

        let mut previous = quote;
        loop {
            match self.advance() {
                None => return Err(LexError::UnterminatedString { line }),
                Some(c) if c == quote && previous != '\\' => break,
                Some(c) => previous = c,
            }
        }

        let lexeme = self.slice_from(start).to_string();
        self.emit(TokenKind::String, lexeme, line, column);
        Ok(())
    }

    /// `$name = value` up to the end of the line or a `#` comment outside
    /// quotes.
    fn tokenize_variable_declaration(&mut self) {
        let (start, line, column) = (self.current_pos, self.line, self.column);
        let _ = self.advance();
        self.advance_while(is_identifier_char);
        self.skip_inline_whitespace();
        // is_variable_declaration() guarantees the `=`
        let _ = self.advance();
        self.skip_inline_whitespace();
        self.scan_to_line_end_or_comment();

        let lexeme = self.slice_from(start).trim().to_string();
        self.emit(TokenKind::VariableDecl, lexeme, line, column);
    }

    fn tokenize_variable_reference(&mut self) {
        let (start, line, column) = (self.current_pos, self.line, self.column);
        let _ = self.advance();
        self.advance_while(is_identifier_char);

        let lexeme = self.slice_from(start).to_string();
        self.emit(TokenKind::VariableRef, lexeme, line, column);
    }

    /// `@component Name(params):`, colon included when present.
    fn tokenize_component_definition(&mut self) {
        let (start, line, column) = (self.current_pos, self.line, self.column);
        self.scan_to_structural_colon();
        if self.current_char() == Some(':') {
            let _ = self.advance();
        }

        let lexeme = self.slice_from(start).trim().to_string();
        self.emit(TokenKind::ComponentDef, lexeme, line, column);
    }

    /// `@Name(args)` up to the end of the line, or through a trailing colon.
    fn tokenize_component_use(&mut self) {
        let (start, line, column) = (self.current_pos, self.line, self.column);
        self.scan_to_structural_colon();
        if self.current_char() == Some(':') {
            let _ = self.advance();
        }

        let lexeme = self.slice_from(start).trim().to_string();
        self.emit(TokenKind::ComponentUse, lexeme, line, column);
    }

    /// `for ...` / `if ...` headers, stopping before the colon.
    fn tokenize_header(&mut self, kind: TokenKind) {
        let (start, line, column) = (self.current_pos, self.line, self.column);
        self.scan_to_structural_colon();

        let lexeme = self.slice_from(start).trim().to_string();
        self.emit(kind, lexeme, line, column);
    }

    /// `else:`, colon included.
    fn tokenize_else(&mut self) {
        let (start, line, column) = (self.current_pos, self.line, self.column);
        self.scan_to_structural_colon();
        if self.current_char() == Some(':') {
            let _ = self.advance();
        }

        let lexeme = self.slice_from(start).trim().to_string();
        self.emit(TokenKind::ElseStatement, lexeme, line, column);
    }

    /// An identifier run is an element header when more text (or a colon)
    /// follows it on the line; otherwise it is plain content.
    fn tokenize_element_or_content(&mut self) {
        let (start, line, column) = (self.current_pos, self.line, self.column);
        self.advance_while(is_name_char);
        let name = self.slice_from(start).to_string();

        match self.next_non_blank() {
            Some(':') => self.emit(TokenKind::Element, name, line, column),
            Some(next) if next != '\n' && next != '#' => {
                self.emit(TokenKind::Element, name, line, column);

                let (attr_start, attr_line, attr_column) =
                    (self.current_pos, self.line, self.column);
                self.scan_to_structural_colon();
                let attributes = self.slice_from(attr_start).trim().to_string();
                if !attributes.is_empty() {
                    let attr_column = attr_column + leading_blank_count(self.slice_from(attr_start));
                    self.emit(TokenKind::Attribute, attributes, attr_line, attr_column);
                }
            }
            _ => self.emit(TokenKind::Content, name, line, column),
        }
    }
}

fn leading_blank_count(s: &str) -> usize {
    s.chars().take_while(|c| is_inline_whitespace(*c)).count()
}
