//! Quoting and substitution helpers shared by the parser and the generator.

/// Characters that delimit string literals.
pub const QUOTE_CHARS: [char; 2] = ['"', '\''];

/// Delimiters of multiline string blocks.
pub const TRIPLE_QUOTES: [&str; 2] = ["\"\"\"", "'''"];

/// Characters allowed after the first one in variable and component names.
#[must_use]
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when `s` is wrapped in a matching pair of `"` or `'`.
#[must_use]
pub fn is_quoted(s: &str) -> bool {
    let mut chars = s.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => QUOTE_CHARS.contains(&first) && first == last,
        _ => false,
    }
}

/// Strip one matching pair of surrounding quotes, if present.
///
/// ```
/// use clarity_common::text::unquote;
///
/// assert_eq!(unquote("\"blue\""), "blue");
/// assert_eq!(unquote("'blue'"), "blue");
/// assert_eq!(unquote("blue"), "blue");
/// assert_eq!(unquote("\"blue'"), "\"blue'");
/// ```
#[must_use]
pub fn unquote(s: &str) -> &str {
    if is_quoted(s) { &s[1..s.len() - 1] } else { s }
}

/// Inner text of a `"""..."""` or `'''...'''` block, delimiters removed.
///
/// Surrounding whitespace outside the delimiters is ignored.
#[must_use]
pub fn triple_quoted_inner(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    TRIPLE_QUOTES.iter().find_map(|delimiter| {
        if trimmed.len() >= 2 * delimiter.len()
            && trimmed.starts_with(delimiter)
            && trimmed.ends_with(delimiter)
        {
            Some(&trimmed[delimiter.len()..trimmed.len() - delimiter.len()])
        } else {
            None
        }
    })
}

/// Replace a backslash-escaped `quote` with the bare quote.
#[must_use]
pub fn unescape_quote(s: &str, quote: char) -> String {
    let escaped = format!("\\{quote}");
    s.replace(&escaped, &quote.to_string())
}

/// Replace every `$name` occurrence with its value.
///
/// Bindings are applied one after another in iteration order, each as a
/// plain text replacement. A value that itself contains `$other` can be
/// rewritten again by a later binding.
///
/// ```
/// use clarity_common::text::substitute;
///
/// let out = substitute("Hello, $name!", [("name", "World")]);
/// assert_eq!(out, "Hello, World!");
/// ```
pub fn substitute<I, N, V>(text: &str, bindings: I) -> String
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = text.to_string();
    for (name, value) in bindings {
        let pattern = format!("${}", name.as_ref());
        if out.contains(&pattern) {
            out = out.replace(&pattern, value.as_ref());
        }
    }
    out
}
