use clarity_ast::OrderedMap;
use clarity_common::text::substitute;

/// Variable bindings visible at the current point of emission.
///
/// Names are stored without the `$` sigil. Bindings keep their insertion
/// order, which is also the order substitution applies them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    bindings: OrderedMap<String>,
}

impl Environment {
    /// An environment with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any previous value in place.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let _ = self.bindings.insert(name, value.into());
    }

    /// Remove a binding, returning its value.
    pub fn unbind(&mut self, name: &str) -> Option<String> {
        self.bindings.remove(name)
    }

    /// Value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Replace every bound `$name` in `text` with its value.
    ///
    /// ```
    /// use clarity_compiler::Environment;
    ///
    /// let mut env = Environment::new();
    /// env.bind("name", "World");
    /// assert_eq!(env.substitute("Hello, $name! $other"), "Hello, World! $other");
    /// ```
    #[must_use]
    pub fn substitute(&self, text: &str) -> String {
        substitute(text, self.iter())
    }

    /// Replace every bound `$name` in `text` with its value as a
    /// double-quoted string literal, ready for the condition evaluator.
    #[must_use]
    pub fn substitute_quoted(&self, text: &str) -> String {
        let quoted = self.iter().map(|(name, value)| (name, quote_literal(value)));
        substitute(text, quoted)
    }
}

/// `value` as a `"..."` literal with backslashes and quotes escaped.
fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
