//! Boolean expressions for `if` statements.
//!
//! The generator substitutes bound variables as string literals before the
//! text reaches this module, so expressions only contain literals:
//!
//! ```text
//! expr       := or
//! or         := and ("or" and)*
//! and        := not ("and" not)*
//! not        := "not" not | comparison
//! comparison := primary (("=="|"!="|"<"|"<="|">"|">=") primary)*
//! primary    := STRING | NUMBER | "true" | "false" | "True" | "False"
//!             | "(" expr ")"
//! ```
//!
//! Comparisons chain, so `1 < 2 < 3` means `1 < 2 and 2 < 3`. Parentheses
//! and `not` may nest at most [`MAX_NESTING`] levels.

use core::fmt;
use std::cmp::Ordering;

use thiserror::Error;

/// Deepest allowed nesting of parentheses and `not`.
pub const MAX_NESTING: usize = 100;

/// Why a condition could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    /// A character that starts no token.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset into the expression.
        offset: usize,
    },

    /// A bare word that is neither a keyword nor a boolean.
    #[error("unknown name '{0}'")]
    UnknownName(String),

    /// A string literal with no closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A numeric literal that does not parse.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// The expression stopped where an operand was needed.
    #[error("unexpected end of condition")]
    UnexpectedEnd,

    /// A token in a position the grammar does not allow.
    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    /// Parentheses or `not` nested past [`MAX_NESTING`].
    #[error("condition nested deeper than {MAX_NESTING} levels")]
    TooDeep,

    /// `<`, `<=`, `>` or `>=` between values of different types.
    #[error("cannot compare {left} {op} {right}")]
    Incomparable {
        /// Left operand.
        left: Value,
        /// Operator as written.
        op: &'static str,
        /// Right operand.
        right: Value,
    },
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted string.
    Str(String),
    /// Integer or decimal number.
    Number(f64),
    /// `true` / `false`.
    Bool(bool),
}

impl Value {
    /// Non-empty strings, non-zero numbers and `true` are truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0,
            Self::Bool(b) => *b,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Evaluate `expr` and return its truthiness.
///
/// ```
/// use clarity_compiler::condition::evaluate;
///
/// assert_eq!(evaluate(r#""yes" == "yes""#), Ok(true));
/// assert_eq!(evaluate("not (1 < 2 and 2 < 1)"), Ok(true));
/// assert!(evaluate("1 < \"a\"").is_err());
/// ```
///
/// # Errors
///
/// Returns a [`ConditionError`] when the expression is malformed or orders
/// values of different types.
pub fn evaluate(expr: &str) -> Result<bool, ConditionError> {
    let tokens = lex(expr)?;
    let mut parser = ExprParser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let tree = parser.parse_or()?;
    if let Some(extra) = parser.tokens.get(parser.pos) {
        return Err(ConditionError::UnexpectedToken(extra.to_string()));
    }
    Ok(tree.eval()?.is_truthy())
}

// =============================================================================
// Lexing
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Literal(Value),
    Compare(CompareOp),
    And,
    Or,
    Not,
    Open,
    Close,
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Compare(op) => f.write_str(op.symbol()),
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
            Self::Not => f.write_str("not"),
            Self::Open => f.write_str("("),
            Self::Close => f.write_str(")"),
        }
    }
}

fn lex(expr: &str) -> Result<Vec<Tok>, ConditionError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                let _ = chars.next();
            }
            '(' | ')' => {
                let _ = chars.next();
                tokens.push(if c == '(' { Tok::Open } else { Tok::Close });
            }
            '"' | '\'' => {
                let _ = chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    match ch {
                        '\\' => match chars.next() {
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        },
                        ch if ch == c => {
                            closed = true;
                            break;
                        }
                        ch => value.push(ch),
                    }
                }
                if !closed {
                    return Err(ConditionError::UnterminatedString);
                }
                tokens.push(Tok::Literal(Value::Str(value)));
            }
            '=' | '!' | '<' | '>' => {
                let _ = chars.next();
                let followed_by_eq = chars.next_if(|&(_, next)| next == '=').is_some();
                let op = match (c, followed_by_eq) {
                    ('=', true) => CompareOp::Eq,
                    ('!', true) => CompareOp::Ne,
                    ('<', false) => CompareOp::Lt,
                    ('<', true) => CompareOp::Le,
                    ('>', false) => CompareOp::Gt,
                    ('>', true) => CompareOp::Ge,
                    _ => return Err(ConditionError::UnexpectedChar { ch: c, offset }),
                };
                tokens.push(Tok::Compare(op));
            }
            c if c.is_ascii_digit() || c == '.' || c == '-' => {
                let mut text = String::new();
                text.push(c);
                let _ = chars.next();
                while let Some((_, next)) = chars.next_if(|&(_, n)| n.is_ascii_digit() || n == '.')
                {
                    text.push(next);
                }
                let number = text
                    .parse::<f64>()
                    .map_err(|_| ConditionError::InvalidNumber(text.clone()))?;
                tokens.push(Tok::Literal(Value::Number(number)));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some((_, next)) = chars.next_if(|&(_, n)| n.is_alphanumeric() || n == '_')
                {
                    word.push(next);
                }
                tokens.push(match word.as_str() {
                    "and" => Tok::And,
                    "or" => Tok::Or,
                    "not" => Tok::Not,
                    "true" | "True" => Tok::Literal(Value::Bool(true)),
                    "false" | "False" => Tok::Literal(Value::Bool(false)),
                    _ => return Err(ConditionError::UnknownName(word)),
                });
            }
            _ => return Err(ConditionError::UnexpectedChar { ch: c, offset }),
        }
    }

    Ok(tokens)
}

// =============================================================================
// Parsing
// =============================================================================

#[derive(Debug)]
enum Expr {
    Literal(Value),
    Not(Box<Expr>),
    /// Operands of a run of `and`, at least two.
    And(Vec<Expr>),
    /// Operands of a run of `or`, at least two.
    Or(Vec<Expr>),
    /// `first op1 second op2 third ...`
    Chain(Box<Expr>, Vec<(CompareOp, Expr)>),
}

struct ExprParser {
    tokens: Vec<Tok>,
    pos: usize,
    /// Open parentheses and `not` operators above the current position.
    depth: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Tok) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn descend(&mut self) -> Result<(), ConditionError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ConditionError::TooDeep);
        }
        Ok(())
    }

    fn parse_or(&mut self) -> Result<Expr, ConditionError> {
        let mut operands = vec![self.parse_and()?];
        while self.eat(&Tok::Or) {
            operands.push(self.parse_and()?);
        }
        Ok(if operands.len() == 1 {
            operands.swap_remove(0)
        } else {
            Expr::Or(operands)
        })
    }

    fn parse_and(&mut self) -> Result<Expr, ConditionError> {
        let mut operands = vec![self.parse_not()?];
        while self.eat(&Tok::And) {
            operands.push(self.parse_not()?);
        }
        Ok(if operands.len() == 1 {
            operands.swap_remove(0)
        } else {
            Expr::And(operands)
        })
    }

    fn parse_not(&mut self) -> Result<Expr, ConditionError> {
        if self.eat(&Tok::Not) {
            self.descend()?;
            let inner = self.parse_not()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ConditionError> {
        let first = self.parse_primary()?;
        let mut rest = Vec::new();
        while let Some(&Tok::Compare(op)) = self.peek() {
            self.pos += 1;
            rest.push((op, self.parse_primary()?));
        }
        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Chain(Box::new(first), rest))
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ConditionError> {
        match self.next() {
            Some(Tok::Literal(value)) => Ok(Expr::Literal(value)),
            Some(Tok::Open) => {
                self.descend()?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                if self.eat(&Tok::Close) {
                    Ok(inner)
                } else {
                    Err(self
                        .peek()
                        .map_or(ConditionError::UnexpectedEnd, |t| {
                            ConditionError::UnexpectedToken(t.to_string())
                        }))
                }
            }
            Some(other) => Err(ConditionError::UnexpectedToken(other.to_string())),
            None => Err(ConditionError::UnexpectedEnd),
        }
    }
}

// =============================================================================
// Evaluation
// =============================================================================

impl Expr {
    fn eval(&self) -> Result<Value, ConditionError> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Not(inner) => Ok(Value::Bool(!inner.eval()?.is_truthy())),
            Self::And(operands) => {
                let mut last = Value::Bool(true);
                for operand in operands {
                    last = operand.eval()?;
                    if !last.is_truthy() {
                        break;
                    }
                }
                Ok(last)
            }
            Self::Or(operands) => {
                let mut last = Value::Bool(false);
                for operand in operands {
                    last = operand.eval()?;
                    if last.is_truthy() {
                        break;
                    }
                }
                Ok(last)
            }
            Self::Chain(first, rest) => {
                let mut left = first.eval()?;
                for (op, operand) in rest {
                    let right = operand.eval()?;
                    if !compare(&left, *op, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    left = right;
                }
                Ok(Value::Bool(true))
            }
        }
    }
}

fn compare(left: &Value, op: CompareOp, right: &Value) -> Result<bool, ConditionError> {
    let ordering = match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => match op {
            CompareOp::Eq => return Ok(false),
            CompareOp::Ne => return Ok(true),
            CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
                return Err(ConditionError::Incomparable {
                    left: left.clone(),
                    op: op.symbol(),
                    right: right.clone(),
                });
            }
        },
    };

    // NaN compares unequal to everything and orders nowhere.
    let Some(ordering) = ordering else {
        return Ok(op == CompareOp::Ne);
    };
    Ok(match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_equality() {
        assert_eq!(evaluate(r#""yes" == "yes""#), Ok(true));
        assert_eq!(evaluate(r#""no" == 'yes'"#), Ok(false));
        assert_eq!(evaluate(r#""a" != "b""#), Ok(true));
    }

    #[test]
    fn numbers_and_chains() {
        assert_eq!(evaluate("1 < 2 < 3"), Ok(true));
        assert_eq!(evaluate("3 > 2 > 2"), Ok(false));
        assert_eq!(evaluate("2.5 >= -1"), Ok(true));
        assert_eq!(evaluate("1 == 1.0"), Ok(true));
    }

    #[test]
    fn boolean_operators_and_precedence() {
        assert_eq!(evaluate("true or false and false"), Ok(true));
        assert_eq!(evaluate("(true or false) and false"), Ok(false));
        assert_eq!(evaluate("not False"), Ok(true));
        assert_eq!(evaluate("not not 0"), Ok(false));
    }

    #[test]
    fn truthiness_of_bare_values() {
        assert_eq!(evaluate(r#""""#), Ok(false));
        assert_eq!(evaluate(r#""x""#), Ok(true));
        assert_eq!(evaluate("0"), Ok(false));
    }

    #[test]
    fn mixed_types() {
        assert_eq!(evaluate(r#""1" == 1"#), Ok(false));
        assert_eq!(evaluate(r#""1" != 1"#), Ok(true));
        assert!(matches!(
            evaluate(r#""1" < 1"#),
            Err(ConditionError::Incomparable { op: "<", .. })
        ));
    }

    #[test]
    fn short_circuit_skips_errors() {
        assert_eq!(evaluate(r#"false and "a" < 1"#), Ok(false));
        assert_eq!(evaluate(r#"true or "a" < 1"#), Ok(true));
    }

    #[test]
    fn escapes_in_strings() {
        assert_eq!(evaluate(r#""say \"hi\"" == 'say "hi"'"#), Ok(true));
    }

    #[test]
    fn malformed_expressions() {
        assert_eq!(evaluate("$flag == 1").unwrap_err(), ConditionError::UnexpectedChar {
            ch: '$',
            offset: 0
        });
        assert_eq!(evaluate("flag").unwrap_err(), ConditionError::UnknownName("flag".into()));
        assert_eq!(evaluate("\"open").unwrap_err(), ConditionError::UnterminatedString);
        assert_eq!(evaluate("1 ==").unwrap_err(), ConditionError::UnexpectedEnd);
        assert_eq!(evaluate("(1").unwrap_err(), ConditionError::UnexpectedEnd);
        assert!(matches!(evaluate("1 2"), Err(ConditionError::UnexpectedToken(_))));
        assert!(matches!(evaluate("1 = 2"), Err(ConditionError::UnexpectedChar { ch: '=', .. })));
        assert!(matches!(evaluate("1.2.3"), Err(ConditionError::InvalidNumber(_))));
        assert_eq!(evaluate("").unwrap_err(), ConditionError::UnexpectedEnd);
    }

    #[test]
    fn nesting_is_bounded() {
        let at_limit = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(evaluate(&at_limit), Ok(true));

        let parens = format!("{}1{}", "(".repeat(3000), ")".repeat(3000));
        assert_eq!(evaluate(&parens).unwrap_err(), ConditionError::TooDeep);

        let nots = format!("{}true", "not ".repeat(3000));
        assert_eq!(evaluate(&nots).unwrap_err(), ConditionError::TooDeep);
    }

    #[test]
    fn long_boolean_runs_stay_flat() {
        let run = ["1"; 5000].join(" and ");
        assert_eq!(evaluate(&run), Ok(true));
        let run = ["0"; 5000].join(" or ");
        assert_eq!(evaluate(&run), Ok(false));
    }
}
