//! Clarity to HTML compiler.
//!
//! Ties the stages together:
//!
//! ```text
//! source text -> Tokenizer -> Parser -> HtmlGenerator -> HTML text
//! ```
//!
//! The generator runs two passes over the tree. The first collects component
//! definitions into a [`components::ComponentTable`]; the second emits HTML
//! depth-first, carrying an explicit [`Environment`] of variable bindings.
//!
//! Only lexical errors stop compilation. Everything else is reported as a
//! warning and the offending construct produces no output, unless strict
//! mode is requested via [`CompileOptions::with_strict_mode`].
//!
//! # Example
//! ```
//! let html = clarity_compiler::compile("$name = \"World\"\np: \"Hello, $name!\"").unwrap();
//! assert_eq!(html, "<p>Hello, World!</p>");
//! ```

/// Component collection pass.
pub mod components;
/// Boolean expression evaluator for `if` conditions.
pub mod condition;
/// Variable bindings during emission.
pub mod environment;
/// HTML emission pass.
pub mod generator;
/// Loop iterable parsing.
pub mod iterable;

use core::fmt;

use clarity_common::warning::{Diagnostics, Warning};
use clarity_syntax::{LexError, ParseIssue, Parser, Tokenizer};
use thiserror::Error;

pub use environment::Environment;
pub use generator::HtmlGenerator;

/// A compilation that could not produce HTML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The source could not be tokenized.
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    /// Strict mode found structural problems.
    #[error("{}", describe_issues(issues))]
    Parse {
        /// Every issue the parser recorded, in source order.
        issues: Vec<ParseIssue>,
    },
}

impl CompileError {
    /// Source line of the first problem.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Lex(err) => Some(err.line()),
            Self::Parse { issues } => issues.first().map(|issue| issue.line),
        }
    }
}

fn describe_issues(issues: &[ParseIssue]) -> String {
    match issues {
        [] => "parse failed".to_string(),
        [only] => format!("parse error at line {}: {}", only.line, only.message),
        [first, rest @ ..] => format!(
            "parse error at line {}: {} (and {} more)",
            first.line,
            first.message,
            rest.len()
        ),
    }
}

/// Settings for [`compile_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fail with [`CompileError::Parse`] when the parser reports any issue.
    pub strict: bool,
    /// Echo warnings to stderr as they are raised.
    pub echo_warnings: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CompileOptions {
    /// Lenient parsing with warnings echoed to stderr.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strict: false,
            echo_warnings: true,
        }
    }

    /// Enable strict mode - parse issues become a [`CompileError::Parse`].
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Keep warnings in the result only, without echoing them.
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.echo_warnings = false;
        self
    }
}

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compilation {
    /// Generated HTML, lines joined with `\n`, no trailing newline.
    pub html: String,
    /// Every warning raised by the parser and the generator, in order.
    pub warnings: Vec<Warning>,
}

/// A step of the pipeline, reported by [`compile_with_progress`] as it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Source text to tokens.
    Tokenize,
    /// Tokens to syntax tree.
    Parse,
    /// Syntax tree to HTML.
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tokenize => "Tokenizing source",
            Self::Parse => "Parsing into syntax tree",
            Self::Generate => "Generating HTML",
        })
    }
}

/// Compile Clarity source to HTML with default options.
///
/// # Errors
///
/// Returns [`CompileError::Lex`] when the source cannot be tokenized.
pub fn compile(source: &str) -> Result<String, CompileError> {
    compile_with(source, &CompileOptions::default()).map(|compilation| compilation.html)
}

/// Compile Clarity source to HTML, keeping the warnings.
///
/// # Errors
///
/// Returns [`CompileError::Lex`] when the source cannot be tokenized, and
/// [`CompileError::Parse`] in strict mode when the parser reports an issue.
pub fn compile_with(source: &str, options: &CompileOptions) -> Result<Compilation, CompileError> {
    compile_with_progress(source, options, |_| {})
}

/// [`compile_with`], calling `on_stage` as each [`Stage`] begins.
///
/// # Errors
///
/// Same as [`compile_with`]. Stages after a failing one are not reported.
pub fn compile_with_progress(
    source: &str,
    options: &CompileOptions,
    mut on_stage: impl FnMut(Stage),
) -> Result<Compilation, CompileError> {
    on_stage(Stage::Tokenize);
    let tokens = Tokenizer::tokenize(source)?;

    let diagnostics = if options.echo_warnings {
        Diagnostics::new()
    } else {
        Diagnostics::silent()
    };
    on_stage(Stage::Parse);
    let mut parser = Parser::new(tokens).with_diagnostics(diagnostics);
    let document = parser.parse();
    if options.strict && !parser.issues().is_empty() {
        return Err(CompileError::Parse {
            issues: parser.issues().to_vec(),
        });
    }

    on_stage(Stage::Generate);
    let mut generator = HtmlGenerator::new(&document).with_diagnostics(parser.into_diagnostics());
    let html = generator.generate();
    Ok(Compilation {
        html,
        warnings: generator.into_diagnostics().into_warnings(),
    })
}
