//! Compiler warnings with colored terminal output.
//!
//! Every stage reports recoverable problems (malformed headers, unknown
//! components, bad loop iterables, ...) through a [`Diagnostics`] sink.
//! The sink keeps a structured record of each warning and, unless silenced,
//! echoes it to stderr. Echoing is deduplicated so a loop that hits the same
//! problem on every iteration prints it once.
//!
//! A sink belongs to a single compilation; nothing here is process-wide.

use std::collections::HashSet;
use std::fmt;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// A single recoverable problem found while compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Stage that raised the warning, e.g. `"Parser"` or `"Generator"`.
    pub component: &'static str,
    /// Human readable description.
    pub message: String,
    /// Source line, when the stage still knows it.
    pub line: Option<usize>,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.component, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

/// Per-compilation warning sink.
///
/// # Example
/// ```
/// use clarity_common::warning::Diagnostics;
///
/// let mut diagnostics = Diagnostics::silent();
/// diagnostics.warn("Generator", "unknown component: Card");
/// assert_eq!(diagnostics.warnings().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
    printed: HashSet<String>,
    echo: bool,
}

impl Diagnostics {
    /// A sink that echoes every new warning to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    /// A sink that only records warnings.
    #[must_use]
    pub fn silent() -> Self {
        Self::default()
    }

    /// Whether new warnings are echoed to stderr.
    #[must_use]
    pub const fn echoes(&self) -> bool {
        self.echo
    }

    /// Record a warning without line information.
    pub fn warn(&mut self, component: &'static str, message: impl Into<String>) {
        self.record(Warning {
            component,
            message: message.into(),
            line: None,
        });
    }

    /// Record a warning attached to a source line.
    pub fn warn_at(&mut self, component: &'static str, line: usize, message: impl Into<String>) {
        self.record(Warning {
            component,
            message: message.into(),
            line: Some(line),
        });
    }

    fn record(&mut self, warning: Warning) {
        if self.echo {
            let key = warning.to_string();
            if self.printed.insert(key) {
                eprintln!(
                    "{YELLOW}[Clarity {}] ⚠ {}{RESET}",
                    warning.component,
                    DisplayMessage(&warning)
                );
            }
        }
        self.warnings.push(warning);
    }

    /// All warnings recorded so far, in the order they were raised.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// True when nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consume the sink, keeping only the records.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// Message plus optional line, without the component prefix.
struct DisplayMessage<'a>(&'a Warning);

impl fmt::Display for DisplayMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.message)?;
        if let Some(line) = self.0.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}
