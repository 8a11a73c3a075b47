//! Loop iterables.
//!
//! A loop iterates over the text of a variable written as a bracketed,
//! comma-separated list, e.g. `["a", "b", "c"]`. Parsing is deliberately
//! shallow: nested brackets and commas inside quotes are not understood, and
//! `[]` yields a single empty item.

use clarity_common::text::{is_quoted, unquote};

/// Split a `[a, b, ...]` literal into its items.
///
/// Items are trimmed. Quotes are removed only when every item is quoted;
/// a mix keeps all items as written. Returns `None` when `raw` is not
/// wrapped in brackets.
///
/// ```
/// use clarity_compiler::iterable::parse_list_literal;
///
/// assert_eq!(parse_list_literal("[\"a\", 'b']").unwrap(), ["a", "b"]);
/// assert_eq!(parse_list_literal("[1, \"b\"]").unwrap(), ["1", "\"b\""]);
/// assert!(parse_list_literal("abc").is_none());
/// ```
#[must_use]
pub fn parse_list_literal(raw: &str) -> Option<Vec<String>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?;
    let items: Vec<&str> = inner.split(',').map(str::trim).collect();

    let all_quoted = items.iter().all(|item| is_quoted(item));
    Some(
        items
            .into_iter()
            .map(|item| if all_quoted { unquote(item) } else { item })
            .map(str::to_string)
            .collect(),
    )
}
