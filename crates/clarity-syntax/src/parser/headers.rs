//! Pattern matching for the raw header text captured by the tokenizer.
//!
//! Each function takes the lexeme of a header token and returns its parts,
//! or `None` when the text does not have the expected shape.

use clarity_ast::Parameter;
use clarity_common::text::{is_identifier_char, unquote};

/// `$name = value` -> `(name, value)`; the value is trimmed, not unquoted.
pub(crate) fn split_variable_declaration(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('$')?;
    let (name, rest) = take_identifier(rest)?;
    let value = rest.trim_start().strip_prefix('=')?;
    Some((name, value.trim()))
}

/// `for <iterator> in <iterable>` -> `(iterator, iterable)`.
pub(crate) fn split_for_header(text: &str) -> Option<(&str, &str)> {
    let rest = strip_keyword(text, "for")?;
    let (iterator, rest) = take_identifier(rest)?;
    let rest = strip_keyword(require_blank(rest)?, "in")?;
    let iterable = rest.trim();
    (!iterable.is_empty()).then_some((iterator, iterable))
}

/// `if <condition>` -> `condition`.
pub(crate) fn split_if_header(text: &str) -> Option<&str> {
    let condition = strip_keyword(text, "if")?.trim();
    (!condition.is_empty()).then_some(condition)
}

/// `@component Name(params)` with an optional trailing colon.
pub(crate) fn split_component_definition(text: &str) -> Option<(&str, Vec<Parameter>)> {
    let rest = strip_keyword(text, "@component")?;
    let (name, rest) = take_identifier(rest)?;
    let rest = rest.trim_start().strip_prefix('(')?;
    let (params, _) = rest.split_once(')')?;
    Some((name, parse_parameters(params)))
}

/// `@Name(args)` or `@Name` -> `(name, raw argument text)`.
///
/// An unclosed argument list is treated as no argument list.
pub(crate) fn split_component_use(text: &str) -> Option<(&str, Option<&str>)> {
    let rest = text.strip_prefix('@')?;
    let (name, rest) = take_identifier(rest)?;
    let args = rest
        .trim_start()
        .strip_prefix('(')
        .and_then(|inner| inner.split_once(')'))
        .map(|(args, _)| args);
    Some((name, args))
}

/// Comma-separated `name` / `name=default` list.
fn parse_parameters(params: &str) -> Vec<Parameter> {
    params
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| match p.split_once('=') {
            Some((name, default)) => Parameter {
                name: name.trim().to_string(),
                default: Some(unquote(default.trim()).to_string()),
            },
            None => Parameter {
                name: p.to_string(),
                default: None,
            },
        })
        .collect()
}

/// One comma-separated argument: `Ok((name, value))` for `name=value`,
/// `Err(arg)` for a positional argument.
pub(crate) fn split_arguments(args: &str) -> impl Iterator<Item = Result<(&str, &str), &str>> {
    args.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| {
            a.split_once('=')
                .map(|(name, value)| (name.trim(), unquote(value.trim())))
                .ok_or(a)
        })
}

/// Split raw attribute text on blanks that are outside quotes.
pub(crate) fn split_attribute_text(raw: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (index, c) in raw.char_indices() {
        match (c, quote) {
            ('"' | '\'', None) => quote = Some(c),
            (q, Some(open)) if q == open => quote = None,
            (' ' | '\t', None) => {
                let piece = raw[start..index].trim();
                if !piece.is_empty() {
                    pieces.push(piece);
                }
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }

    let piece = raw[start..].trim();
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// `keyword` followed by at least one blank; returns the text after the
/// blanks.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    require_blank(text.strip_prefix(keyword)?)
}

fn require_blank(text: &str) -> Option<&str> {
    text.starts_with(char::is_whitespace)
        .then(|| text.trim_start())
}

/// Leading `[A-Za-z0-9_]+` and the remainder.
fn take_identifier(text: &str) -> Option<(&str, &str)> {
    let end = text
        .find(|c: char| !is_identifier_char(c))
        .unwrap_or(text.len());
    (end > 0).then(|| text.split_at(end))
}
