use core::fmt;

use strum_macros::{Display, EnumIter};

/// Kind of a token. Renders in `SCREAMING_SNAKE_CASE`, e.g. `VARIABLE_DECL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// Element name at the start of an element header.
    Element,
    /// Raw attribute text between an element name and its colon.
    Attribute,
    /// A bare word that is not an element header.
    Content,
    /// `"..."` or `'...'`, quotes included in the lexeme.
    String,
    /// `"""..."""` or `'''...'''`, delimiters included in the lexeme.
    MultilineString,
    /// Whole `$name = value` line.
    VariableDecl,
    /// `$name`
    VariableRef,
    /// `:`
    Colon,
    /// `for x in $items` header, without the colon.
    ForLoop,
    /// `if condition` header, without the colon.
    IfStatement,
    /// `else:` header, colon included.
    ElseStatement,
    /// `@component Name(params):` header, colon included.
    ComponentDef,
    /// `@Name(args)` invocation.
    ComponentUse,
    /// `# ...` up to the end of the line.
    Comment,
    /// End of a physical line.
    Newline,
    /// Indentation grew.
    Indent,
    /// Indentation shrank by one level.
    Dedent,
    /// End of input.
    Eof,
}

/// A lexeme with its kind and position. Tokens are never modified after the
/// tokenizer emits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Raw source text of the token.
    pub lexeme: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    /// Returns true if this is the end-of-file token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof => {
                write!(f, "{}", self.kind)?;
            }
            TokenKind::Indent => write!(f, "INDENT({})", self.lexeme.len())?,
            _ => {
                let display = self.lexeme.replace('\n', "\\n");
                write!(f, "{} '{display}'", self.kind)?;
            }
        }
        write!(f, " @{}:{}", self.line, self.column)
    }
}
