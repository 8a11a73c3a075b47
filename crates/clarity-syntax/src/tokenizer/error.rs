use thiserror::Error;

/// A fatal tokenizer error. Compilation stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A `"` or `'` string with no closing quote.
    #[error("unterminated string starting at line {line}")]
    UnterminatedString {
        /// Line of the opening quote.
        line: usize,
    },

    /// A `"""` or `'''` block with no closing delimiter.
    #[error("unterminated multi-line string starting at line {line}")]
    UnterminatedMultilineString {
        /// Line of the opening delimiter.
        line: usize,
    },

    /// A dedent to a width that was never pushed on the indentation stack.
    #[error("inconsistent indentation at line {line}")]
    InconsistentIndentation {
        /// Line whose indentation does not match any open level.
        line: usize,
    },
}

impl LexError {
    /// Source line the error refers to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line }
            | Self::UnterminatedMultilineString { line }
            | Self::InconsistentIndentation { line } => *line,
        }
    }
}
